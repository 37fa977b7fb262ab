use std::path::Path;

use anyhow::Result;

use invoice_render::PersonaCatalog;

use super::print::load_catalog;

/// List the issuer personas available for the `print` command.
pub fn run(personas_file: Option<&Path>) -> Result<String> {
    let catalog = load_catalog(personas_file)?;

    Ok(render(&catalog))
}

fn render(catalog: &PersonaCatalog) -> String {
    catalog
        .keys()
        .into_iter()
        .map(|key| {
            let persona = catalog.get(key);
            let marker = if key == catalog.default_key() {
                " (default)"
            } else {
                ""
            };
            format!("{key}: {} <{}>{marker}", persona.full_name(), persona.email)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lists_builtin_personas_with_default_marker() {
        let output = render(&PersonaCatalog::builtin());

        assert_eq!(
            output,
            "persona1: Mr. John Doe Jr. <john.doe@example.com> (default)\n\
             persona2: Ms. Jane Smith <jane.smith@example.com>"
        );
    }
}
