// Copyright (c) Contributors to the manifest-split project.
// SPDX-License-Identifier: Apache-2.0

//! Verification hash element for split manifests.
//!
//! The digest covers the serialized root exactly as it is before the hash
//! element is inserted. Verification therefore removes the trailing hash
//! element and recomputes over what remains.

use sha1::{Digest, Sha1};

use crate::manifest::{Element, Manifest, Node};
use crate::{HASH_ELEMENT, HASH_TYPE};

#[cfg(test)]
#[path = "./hash_test.rs"]
mod hash_test;

/// Lowercase hex SHA-1 of the manifest's serialized root.
pub fn manifest_digest(manifest: &Manifest) -> String {
    format!("{:x}", Sha1::digest(manifest.to_bytes()))
}

/// Build `<hash name=".." type="sha1" value=".." />` for `manifest`.
pub fn create_manifest_hash_element(manifest: &Manifest, name: &str) -> Element {
    Element::new(HASH_ELEMENT)
        .with_attribute("name", name)
        .with_attribute("type", HASH_TYPE)
        .with_attribute("value", manifest_digest(manifest))
}

/// Hash `manifest` and append the hash element as the last child of its
/// root. Returns the digest.
pub fn append_manifest_hash(manifest: &mut Manifest, name: &str) -> String {
    let element = create_manifest_hash_element(manifest, name);
    let digest = element.attribute("value").unwrap_or_default().to_string();
    manifest.root_mut().push_child(element);
    digest
}

/// Remove every `<hash>` child of the root, returning how many were removed.
pub fn remove_manifest_hash(manifest: &mut Manifest) -> usize {
    let children = &mut manifest.root_mut().children;
    let before = children.len();
    children.retain(|child| !matches!(child, Node::Element(e) if e.name == HASH_ELEMENT));
    before - children.len()
}

/// Outcome of verifying a manifest's hash element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashCheck {
    /// The recorded digest matches the manifest content.
    Verified { name: String, digest: String },
    /// The manifest changed after it was hashed.
    Mismatch {
        name: String,
        expected: String,
        actual: String,
    },
    /// The root's last child is not a hash element.
    Missing,
    /// The hash element names a digest this crate does not compute.
    UnsupportedType(String),
}

impl HashCheck {
    pub fn is_verified(&self) -> bool {
        matches!(self, HashCheck::Verified { .. })
    }
}

/// Check the trailing hash element of `manifest` against its content.
pub fn verify_manifest_hash(manifest: &Manifest) -> HashCheck {
    let mut unhashed = manifest.clone();
    let children = &mut unhashed.root_mut().children;
    let element = match children.last() {
        Some(Node::Element(e)) if e.name == HASH_ELEMENT => e.clone(),
        _ => return HashCheck::Missing,
    };
    children.pop();

    let kind = element.attribute("type").unwrap_or_default();
    if kind != HASH_TYPE {
        return HashCheck::UnsupportedType(kind.to_string());
    }

    let name = element.attribute("name").unwrap_or_default().to_string();
    let expected = element.attribute("value").unwrap_or_default().to_string();
    let actual = manifest_digest(&unhashed);
    if actual.eq_ignore_ascii_case(&expected) {
        HashCheck::Verified {
            name,
            digest: actual,
        }
    } else {
        HashCheck::Mismatch {
            name,
            expected,
            actual,
        }
    }
}
