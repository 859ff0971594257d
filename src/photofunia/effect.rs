//! Effect requests: a service route plus its form parameters.
use std::collections::BTreeMap;

/// Crop geometry sent with the built-in presets.
pub const DEFAULT_CROP: &str = "0.0.961.1093";

/// A named effect path (e.g. `faces/fat_maker`) and its form parameters.
///
/// The uploaded image key is added by the pipeline as parameter `image`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effect {
    path: String,
    label: Option<String>,
    params: BTreeMap<String, String>,
}

impl Effect {
    pub fn new(path: impl Into<String>) -> Self {
        Effect { path: path.into(), label: None, params: BTreeMap::new() }
    }

    /// Names the effect in log messages instead of its last path segment.
    pub fn named(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets a form parameter, replacing any previous value for `name`.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Sets a checkbox-style parameter, serialised as `on`/`off`.
    pub fn toggle(self, name: impl Into<String>, enabled: bool) -> Self {
        self.param(name, if enabled { "on" } else { "off" })
    }

    /// The "fat maker" face effect.
    pub fn fat_maker() -> Self {
        Effect::new("faces/fat_maker")
            .named("fatify")
            .param("current-category", "faces")
            .param("image:crop", DEFAULT_CROP)
            .param("size", "XXXXXL")
    }

    /// The clown effect, optionally with a clown hat.
    pub fn clown(include_hat: bool) -> Self {
        Effect::new("all_effects/clown")
            .named("clownify")
            .param("current-category", "all_effects")
            .param("image:crop", DEFAULT_CROP)
            .toggle("hat", include_hat)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Name used in log messages: the label if set, else the last path segment.
    pub fn name(&self) -> &str {
        match &self.label {
            Some(label) => label.as_str(),
            None => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }

    pub(crate) fn into_params(self) -> BTreeMap<String, String> {
        self.params
    }
}
