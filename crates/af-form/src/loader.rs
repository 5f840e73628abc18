//! Config loaders — turn a painted region's placeholders into bound fields.
//!
//! The editor never decides which widget goes where. After painting a
//! region it hands the [`PlaceholderMap`] to a [`ConfigLoader`], which
//! returns a fully bound [`RegionController`] or an error. A loader must
//! not hand back a partially bound controller.
//!
//! [`MenuConfigLoader`] is the stock loader. It creates one field per
//! placeholder (field id = placeholder index, widget by MCI code) and
//! applies the overrides in a [`MenuConfig`]:
//!
//! ```yaml
//! 0:                      # form id
//!   fields:
//!     1: { accepts_focus: false }
//!     2: { max_len: 30 }
//!     9: { placeholder: 3, kind: button, text: "Save" }
//! ```
//!
//! An override with a `placeholder` different from its own id adds an
//! extra field on that placeholder.

use std::collections::BTreeMap;

use af_art::PlaceholderMap;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::controller::RegionController;
use crate::error::LoadError;
use crate::field::{FieldId, FieldKind, FieldSpec};
use crate::region::FormId;

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// The menu that opened the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuContext {
    pub name: String,
}

impl MenuContext {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One load call's inputs.
#[derive(Debug, Clone, Copy)]
pub struct LoadRequest<'a> {
    pub form_id: FormId,
    /// Placeholders in screen coordinates.
    pub placeholders: &'a PlaceholderMap,
    pub calling_menu: &'a MenuContext,
}

/// Binds a region's fields.
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    async fn load(&self, request: LoadRequest<'_>) -> Result<RegionController, LoadError>;
}

// ---------------------------------------------------------------------------
// MenuConfig
// ---------------------------------------------------------------------------

/// Per-field settings. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldOverride {
    pub placeholder: Option<usize>,
    pub kind: Option<FieldKind>,
    pub text: Option<String>,
    pub accepts_focus: Option<bool>,
    pub read_only: Option<bool>,
    pub max_len: Option<usize>,
    pub width: Option<u16>,
    pub height: Option<u16>,
}

impl FieldOverride {
    fn apply(&self, spec: &mut FieldSpec) {
        if let Some(kind) = self.kind {
            spec.kind = kind;
            spec.accepts_focus = kind.default_accepts_focus();
        }
        if let Some(text) = &self.text {
            spec.text.clone_from(text);
        }
        if let Some(accepts_focus) = self.accepts_focus {
            spec.accepts_focus = accepts_focus;
        }
        if let Some(read_only) = self.read_only {
            spec.read_only = read_only;
        }
        spec.max_len = self.max_len.or(spec.max_len);
        spec.width = self.width.or(spec.width);
        spec.height = self.height.or(spec.height);
    }
}

/// Overrides for one form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    pub fields: BTreeMap<FieldId, FieldOverride>,
}

/// Overrides for every form, keyed by form id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct MenuConfig {
    pub forms: BTreeMap<FormId, FormConfig>,
}

impl MenuConfig {
    /// Field specs for `form_id` over `placeholders`.
    pub fn specs_for(
        &self,
        form_id: FormId,
        placeholders: &PlaceholderMap,
    ) -> Result<Vec<FieldSpec>, LoadError> {
        let mut specs: Vec<FieldSpec> = placeholders
            .iter()
            .map(FieldSpec::for_placeholder)
            .collect();

        let Some(form) = self.forms.get(&form_id) else {
            return Ok(specs);
        };

        for (&id, over) in &form.fields {
            let own = specs
                .iter()
                .position(|s| s.id == id)
                .filter(|&i| over.placeholder.is_none_or(|p| p == specs[i].placeholder));

            match (own, over.placeholder) {
                (Some(i), _) => over.apply(&mut specs[i]),
                (None, Some(placeholder)) => {
                    let kind = placeholders
                        .get(placeholder)
                        .map_or(FieldKind::Label, |p| FieldKind::from_mci(&p.code));
                    let mut spec = FieldSpec::new(id, placeholder, kind);
                    over.apply(&mut spec);
                    specs.push(spec);
                }
                (None, None) => return Err(LoadError::UnknownField { form_id, id }),
            }
        }

        Ok(specs)
    }
}

// ---------------------------------------------------------------------------
// MenuConfigLoader
// ---------------------------------------------------------------------------

/// Binds forms from a [`MenuConfig`].
#[derive(Debug, Clone, Default)]
pub struct MenuConfigLoader {
    config: MenuConfig,
}

impl MenuConfigLoader {
    #[must_use]
    pub const fn new(config: MenuConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConfigLoader for MenuConfigLoader {
    async fn load(&self, request: LoadRequest<'_>) -> Result<RegionController, LoadError> {
        let specs = self.config.specs_for(request.form_id, request.placeholders)?;
        let controller = RegionController::bound(request.form_id, request.placeholders, &specs)?;
        debug!(
            form_id = request.form_id,
            menu = %request.calling_menu.name,
            fields = controller.len(),
            "loaded form"
        );
        Ok(controller)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
