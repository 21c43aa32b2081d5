//! `services` command: list what is registered.

use serde_json::json;

use crate::core::registry::Registries;
use crate::error::Result;
use crate::render::Output;

/// Write registered services and outputs to `output`.
///
/// # Errors
///
/// Returns an error if the JSON listing cannot be serialized.
pub fn execute(registries: &Registries, output: &dyn Output, pretty: bool) -> Result<()> {
    let services = registries.services.services();

    if output.name() == "json" {
        let listing = json!({
            "services": services
                .iter()
                .map(|s| json!({ "name": s.name(), "displayName": s.display_name() }))
                .collect::<Vec<_>>(),
            "outputs": registries.outputs.names(),
        });
        let rendered = if pretty {
            serde_json::to_string_pretty(&listing)?
        } else {
            serde_json::to_string(&listing)?
        };
        output.info(&rendered);
        return Ok(());
    }

    output.info("Services:");
    for service in &services {
        output.info(&format!("  {:<10} {}", service.name(), service.display_name()));
    }
    output.info("Outputs:");
    for name in registries.outputs.names() {
        output.info(&format!("  {name}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ResolvedConfig;
    use crate::test_utils::RecordingOutput;

    #[test]
    fn lists_builtin_services_and_outputs() {
        let registries = Registries::build(&ResolvedConfig::default()).unwrap();
        let output = RecordingOutput::new();

        execute(&registries, &output, false).unwrap();

        assert_eq!(
            output.infos(),
            vec![
                "Services:".to_string(),
                "  github     GitHub".to_string(),
                "  gitlab     GitLab".to_string(),
                "Outputs:".to_string(),
                "  json".to_string(),
                "  text".to_string(),
            ]
        );
    }
}
