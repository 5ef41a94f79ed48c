//! The `versevault init` command.

use std::path::Path;

use anyhow::Result;

const CONFIG_FILE: &str = "versevault.toml";

pub fn execute() -> Result<()> {
    if Path::new(CONFIG_FILE).exists() {
        println!("{CONFIG_FILE} already exists, skipping.");
        return Ok(());
    }
    std::fs::write(CONFIG_FILE, SAMPLE_CONFIG)?;
    println!("Created {CONFIG_FILE}");

    println!("\nNext steps:");
    println!("  1. Uncomment [supabase] in {CONFIG_FILE} to sync with a Supabase project");
    println!("  2. Run: versevault add --reference \"John 3:16\" --text \"For God so loved the world\"");
    println!("  3. Run: versevault quiz memorize");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# versevault configuration

# Local SQLite file, used when no Supabase project is configured
# or the project cannot be reached.
database_path = "vv_local.db"

# [supabase]
# url = "https://your-project.supabase.co"
# key = "${SUPABASE_ANON_KEY}"
# verses_table = "verses"
# future_table = "future_verses"
"#;
