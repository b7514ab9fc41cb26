//! Reusable prompts using Handlebars for templating. Output is plain
//! text for the model, so HTML escaping is turned off.

use std::fmt;

use handlebars::Handlebars;

#[derive(Debug)]
pub enum Prompt {
    Discovery,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<Prompt> for String {
    fn from(item: Prompt) -> String {
        format!("{:?}", item)
    }
}

const DISCOVERY_PROMPT: &str = r#"
Suggest {{count}} additional {{category}} in {{governorate}}, Egypt that a visitor would enjoy.

Do not suggest any of these places:
{{#each existing}}
- {{this}}
{{/each}}

Return ONLY a JSON array with no other text. Each element is an object with the fields "name", "shortDescription", "longDescription" and "rating".
"name", "shortDescription" and "longDescription" are objects with one translation for each of these language codes: {{#each languages}}{{this}}{{#unless @last}}, {{/unless}}{{/each}}.
"shortDescription" is one sentence, "longDescription" is two or three sentences, and "rating" is a number between 1 and 5.
"#;

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string(&Prompt::Discovery.to_string(), DISCOVERY_PROMPT)
        .expect("Failed to register template");
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_discovery_prompt_renders() {
        let rendered = templates()
            .render(
                &Prompt::Discovery.to_string(),
                &json!({
                    "count": 3,
                    "category": "cafés",
                    "governorate": "Cairo",
                    "existing": ["El Fishawy Cafe", "Groppi's"],
                    "languages": ["en", "fr", "ar"],
                }),
            )
            .unwrap();

        assert!(rendered.contains("Suggest 3 additional cafés in Cairo, Egypt"));
        assert!(rendered.contains("- El Fishawy Cafe\n"));
        assert!(rendered.contains("- Groppi's\n"));
        assert!(rendered.contains("language codes: en, fr, ar."));
    }

    #[test]
    fn test_strict_mode_rejects_missing_fields() {
        let rendered = templates().render(&Prompt::Discovery.to_string(), &json!({"count": 3}));
        assert!(rendered.is_err());
    }
}
