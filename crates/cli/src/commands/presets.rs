//! The `presets` command - lists the preset catalog.

use clap::Args;
use isocfg::{Preset, compile};

#[derive(Args)]
pub struct PresetsArgs {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog_json())?);
    } else {
        print_text();
    }
    Ok(())
}

fn catalog_json() -> serde_json::Value {
    let presets: Vec<_> = Preset::ALL
        .iter()
        .map(|preset| {
            serde_json::json!({
                "name": preset.name(),
                "description": preset.description(),
                "command": compile(&preset.apply()),
            })
        })
        .collect();
    serde_json::json!({ "presets": presets })
}

fn print_text() {
    println!("Available presets:");
    println!();

    for preset in Preset::ALL {
        println!("  {}", preset.name());
        println!("    {}", preset.description());
        println!("    {}", compile(&preset.apply()));
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_every_preset() {
        let json = catalog_json();
        let presets = json["presets"].as_array().unwrap();
        assert_eq!(presets.len(), Preset::ALL.len());
        assert_eq!(presets[0]["name"], "basic");
        assert!(
            presets[1]["command"]
                .as_str()
                .unwrap()
                .starts_with("isolate --box-id=0")
        );
    }
}
