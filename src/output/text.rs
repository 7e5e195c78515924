use crate::error::AppResult;

pub fn print_line(line: &str) -> AppResult<()> {
    println!("{line}");
    Ok(())
}

/// Prints each line of `block` with a fixed indent; blank lines stay blank.
pub fn print_indented(block: &str, indent: usize) {
    let pad = " ".repeat(indent);
    for line in block.lines() {
        if line.is_empty() {
            println!();
        } else {
            println!("{pad}{line}");
        }
    }
}
