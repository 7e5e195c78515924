use serde::Serialize;

use crate::cli::{RenderArgs, RenderMode};
use crate::context::AppContext;
use crate::error::AppResult;
use crate::mail::normalize::{normalize, to_display_html};
use crate::mail::quote::{collapse_quoted, split_quoted};
use crate::output::text;

use super::read_body;

#[derive(Debug, Serialize)]
struct Rendered {
    output: String,
}

/// Runs one stage of the body pipeline over local input. No store access.
pub fn run(ctx: &AppContext, args: RenderArgs) -> AppResult<()> {
    let input = read_body(&args.body, true)?;

    let output = match args.mode {
        RenderMode::Normalize => normalize(Some(&input)),
        RenderMode::Display => to_display_html(&normalize(Some(&input))),
        RenderMode::Collapse => collapse_quoted(&input),
        RenderMode::Split => return print_split(ctx, &input),
    };

    let rendered = Rendered { output };
    ctx.output.emit(&rendered.output, &rendered)
}

fn print_split(ctx: &AppContext, input: &str) -> AppResult<()> {
    let split = split_quoted(input);
    if !ctx.output.is_text() {
        return ctx.output.emit("", &split);
    }

    text::print_indented(&split.main, 0);
    if split.has_quoted() {
        println!("---- quoted ----");
        text::print_indented(&split.quoted, 0);
    }
    Ok(())
}
