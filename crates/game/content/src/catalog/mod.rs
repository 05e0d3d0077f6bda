//! Plain-data definitions of statuses and abilities.
//!
//! A catalog holds specs; instantiating a spec builds a fresh core object with its
//! own component and behavior state. Specs refer to each other by name (a channel
//! ability names the status it applies), and [`AbilityCatalog::validate`] checks
//! those references up front.

mod ability;
mod status;

pub use ability::{AbilityCatalog, AbilitySpec, BehaviorSpec};
pub use status::{ComponentSpec, StatusCatalog, StatusSpec};

use std::collections::HashSet;

use crate::error::ContentError;

/// Fails on the first name that appears twice.
fn ensure_unique<'a>(
    kind: &'static str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ContentError::Duplicate {
                kind,
                name: name.to_owned(),
            });
        }
    }
    Ok(())
}
