//! Plans the label changes that bring the repository in line with the
//! configured categories.
use std::collections::HashMap;

use crate::{
    config::LabelSpec,
    forge::request::{CreateLabelRequest, RepoLabel, UpdateLabelRequest},
};

/// A single change to the repository's labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelChange {
    Create(CreateLabelRequest),
    Update(UpdateLabelRequest),
}

/// Compute the changes needed so every label in `desired` exists with its
/// configured color and description. Labels already matching are left
/// alone. When a label is configured more than once, later entries are
/// compared against the result of earlier ones.
pub fn plan_label_sync(
    desired: &[LabelSpec],
    existing: &[RepoLabel],
) -> Vec<LabelChange> {
    let mut current: HashMap<String, RepoLabel> = existing
        .iter()
        .map(|label| (label.name.clone(), label.clone()))
        .collect();

    let mut changes = vec![];

    for spec in desired {
        let Some(extant) = current.get_mut(&spec.name) else {
            current.insert(
                spec.name.clone(),
                RepoLabel {
                    name: spec.name.clone(),
                    color: spec.color.clone().unwrap_or_default(),
                    description: spec.description.clone(),
                },
            );
            changes.push(LabelChange::Create(CreateLabelRequest {
                name: spec.name.clone(),
                color: spec.color.clone(),
                description: spec.description.clone(),
            }));
            continue;
        };

        let color = spec
            .color
            .as_ref()
            .filter(|color| !color.eq_ignore_ascii_case(&extant.color))
            .cloned();

        let wanted_description = spec.description.clone().unwrap_or_default();
        let description = (wanted_description
            != extant.description.clone().unwrap_or_default())
        .then_some(wanted_description);

        if color.is_none() && description.is_none() {
            continue;
        }

        if let Some(color) = &color {
            extant.color = color.clone();
        }
        if let Some(description) = &description {
            extant.description = Some(description.clone());
        }

        changes.push(LabelChange::Update(UpdateLabelRequest {
            name: spec.name.clone(),
            color,
            description,
        }));
    }

    changes
}
