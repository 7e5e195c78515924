pub fn list_folders_endpoint() -> &'static str {
    "/api/folders"
}
