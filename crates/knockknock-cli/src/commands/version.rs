use knockknock_core::version::version_string;
use miette::Result;

pub fn run(json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "version": knockknock_core::VERSION,
            })
        );
    } else {
        println!("{}", version_string());
    }
    Ok(())
}
