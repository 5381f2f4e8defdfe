//! `print-config`: show the configuration a run would use.

use crate::cli::args::{ConfigFormat, PrintConfigArgs};
use crate::config::PresentationConfig;
use crate::error::LaunchError;

/// Prints the effective configuration, defaults filled in.
///
/// # Errors
///
/// Returns an error if the configuration fails to load or serialize.
pub fn run(args: &PrintConfigArgs) -> Result<(), LaunchError> {
    let config = super::load_config(args.config.as_deref())?;
    print!("{}", render(&config, args.format)?);
    Ok(())
}

fn render(config: &PresentationConfig, format: ConfigFormat) -> Result<String, LaunchError> {
    Ok(match format {
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
        ConfigFormat::Json => format!("{}\n", serde_json::to_string_pretty(config)?),
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::config::ConfigLoader;

    #[test]
    fn yaml_output_loads_back_unchanged() {
        let config = PresentationConfig::default();
        let yaml = render(&config, ConfigFormat::Yaml).unwrap();
        let loaded = ConfigLoader::default()
            .load_str(&yaml, Path::new("<print-config>"))
            .unwrap();
        assert_eq!(*loaded.config, config);
    }

    #[test]
    fn json_output_uses_humantime_durations() {
        let json = render(&PresentationConfig::default(), ConfigFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["timings"]["loading"], "3s");
        assert_eq!(value["loading"]["progress_interval"], "60ms");
        assert_eq!(
            value["presentation"]["destination_url"],
            "https://greenthicks.live"
        );
    }
}
