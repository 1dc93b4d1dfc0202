//! Ordered component list of a page being edited.

use rand::Rng;
use serde_json::Value;

use crate::components::ComponentKind;
use crate::models::{ComponentTemplate, LandingPageComponent};

/// Inline `data:` images above this estimated size are dropped before save.
pub const MAX_INLINE_IMAGE_BYTES: usize = 1024 * 1024;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `{type}-{unix_millis}-{9 random base-36 chars}`
pub fn new_component_id(kind: ComponentKind) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{kind}-{millis}-{suffix}")
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageEditor {
    components: Vec<LandingPageComponent>,
}

impl PageEditor {
    pub fn new(components: Vec<LandingPageComponent>) -> Self {
        Self { components }
    }

    pub fn components(&self) -> &[LandingPageComponent] {
        &self.components
    }

    pub fn into_components(self) -> Vec<LandingPageComponent> {
        self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LandingPageComponent> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Appends a copy of the template's config under a fresh id. Returns the new id.
    pub fn add_component(&mut self, template: &ComponentTemplate) -> String {
        self.add_config(template.kind, template.config.clone())
    }

    pub fn add_config(&mut self, kind: ComponentKind, config: Value) -> String {
        let id = new_component_id(kind);
        let order = self.components.len() as u32;
        self.components.push(LandingPageComponent::new(id.clone(), kind, config, order));
        id
    }

    /// Replaces the config of `id`. Returns false when no entry matches.
    pub fn update_component(&mut self, id: &str, config: &Value) -> bool {
        match self.components.iter_mut().find(|c| c.id == id) {
            Some(component) => {
                component.config = config.clone();
                true
            }
            None => false,
        }
    }

    /// Removes `id`. The `order` of the remaining entries is not rewritten.
    pub fn remove_component(&mut self, id: &str) -> bool {
        let before = self.components.len();
        self.components.retain(|c| c.id != id);
        self.components.len() != before
    }

    /// Moves `from_id` to the position of `to_id`, then sets every `order`
    /// to its index. Does nothing for equal or unknown ids.
    pub fn reorder(&mut self, from_id: &str, to_id: &str) -> bool {
        if from_id == to_id {
            return false;
        }
        let from = self.components.iter().position(|c| c.id == from_id);
        let to = self.components.iter().position(|c| c.id == to_id);
        let (Some(from), Some(to)) = (from, to) else {
            return false;
        };
        let moved = self.components.remove(from);
        self.components.insert(to, moved);
        for (index, component) in self.components.iter_mut().enumerate() {
            component.order = index as u32;
        }
        true
    }

    /// Copy of the list with oversized inline images blanked out.
    pub fn prepare_for_save(&self) -> Vec<LandingPageComponent> {
        strip_oversized_images(&self.components)
    }
}

pub fn strip_oversized_images(components: &[LandingPageComponent]) -> Vec<LandingPageComponent> {
    components
        .iter()
        .map(|component| {
            let mut cleaned = component.clone();
            let stripped = strip_value(&mut cleaned.config);
            if stripped > 0 {
                log::warn!(
                    "dropped {stripped} oversized inline image(s) from component {}",
                    component.id
                );
            }
            cleaned
        })
        .collect()
}

fn strip_value(value: &mut Value) -> usize {
    match value {
        Value::String(s) if is_oversized_data_url(s) => {
            s.clear();
            1
        }
        Value::Array(items) => items.iter_mut().map(strip_value).sum(),
        Value::Object(map) => map.values_mut().map(strip_value).sum(),
        _ => 0,
    }
}

fn is_oversized_data_url(s: &str) -> bool {
    s.starts_with("data:") && s.len() * 3 / 4 > MAX_INLINE_IMAGE_BYTES
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn component(id: &str, order: u32) -> LandingPageComponent {
        LandingPageComponent::new(id, ComponentKind::Hero, json!({}), order)
    }

    fn ids(editor: &PageEditor) -> Vec<&str> {
        editor.components().iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn component_ids_have_expected_shape() {
        let id = new_component_id(ComponentKind::CustomImage);
        let parts: Vec<&str> = id.rsplitn(3, '-').collect();
        assert_eq!(parts[0].len(), 9);
        assert!(parts[0].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2], "custom-image");
    }

    #[test]
    fn reorder_moves_and_renumbers() {
        let mut editor = PageEditor::new(vec![component("a", 0), component("b", 1), component("c", 2)]);
        assert!(editor.reorder("a", "c"));
        assert_eq!(ids(&editor), ["b", "c", "a"]);
        for (i, c) in editor.components().iter().enumerate() {
            assert_eq!(c.order, i as u32);
        }
        assert!(editor.reorder("a", "b"));
        assert_eq!(ids(&editor), ["a", "b", "c"]);
    }

    #[test]
    fn reorder_ignores_same_or_unknown_ids() {
        let mut editor = PageEditor::new(vec![component("a", 5), component("b", 9)]);
        let before = editor.clone();
        assert!(!editor.reorder("a", "a"));
        assert!(!editor.reorder("a", "zzz"));
        assert!(!editor.reorder("zzz", "b"));
        assert_eq!(editor, before);
    }

    #[test]
    fn remove_keeps_survivor_order() {
        let mut editor = PageEditor::new(vec![component("a", 0), component("b", 1)]);
        assert!(editor.remove_component("a"));
        assert_eq!(editor.len(), 1);
        assert_eq!(editor.components()[0].order, 1);
        assert!(!editor.remove_component("a"));
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let mut editor = PageEditor::new(vec![component("a", 0)]);
        assert!(!editor.update_component("nope", &json!({"title": "x"})));
        assert_eq!(editor.components()[0].config, json!({}));
        assert!(editor.update_component("a", &json!({"title": "x"})));
        assert_eq!(editor.components()[0].config["title"], "x");
    }

    #[test]
    fn stripper_only_touches_large_data_urls() {
        let big = format!("data:image/png;base64,{}", "A".repeat(2 * 1024 * 1024));
        let small = format!("data:image/png;base64,{}", "A".repeat(1024));
        let config = json!({
            "desktopImage": big,
            "mobileImage": small,
            "title": "Tower A",
            "gallery": [{"url": big}, {"url": "https://cdn.example.com/a.jpg"}]
        });
        let editor =
            PageEditor::new(vec![LandingPageComponent::new("img", ComponentKind::CustomImage, config, 0)]);
        let saved = editor.prepare_for_save();
        let config = &saved[0].config;
        assert_eq!(config["desktopImage"], "");
        assert_eq!(config["mobileImage"], small.as_str());
        assert_eq!(config["title"], "Tower A");
        assert_eq!(config["gallery"][0]["url"], "");
        assert_eq!(config["gallery"][1]["url"], "https://cdn.example.com/a.jpg");
        // the editor itself is untouched
        assert_eq!(editor.components()[0].config["desktopImage"].as_str().map(str::len), Some(big.len()));
    }
}
