use crate::context::AppContext;
use crate::error::AppResult;
use crate::store::FolderStore;

pub async fn run(ctx: &AppContext) -> AppResult<()> {
    let user = ctx.current_user()?;
    let folders = ctx.client.folder_map(&user.id).await?;

    if ctx.output.is_text() {
        if folders.is_empty() {
            println!("0 folders");
            return Ok(());
        }

        for (kind, id) in folders.iter() {
            println!("{:<8} {id}", kind.as_str());
        }
        return Ok(());
    }

    let text = format!("{} folders", folders.iter().count());
    ctx.output.emit(&text, &folders)
}
