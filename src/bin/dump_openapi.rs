use std::fs;

fn main() -> anyhow::Result<()> {
    let doc = leavedesk::docs::openapi();
    let json = serde_json::to_string_pretty(&doc)?;
    let path = "openapi.json";
    fs::write(path, json)?;
    println!("wrote {}", path);
    Ok(())
}
