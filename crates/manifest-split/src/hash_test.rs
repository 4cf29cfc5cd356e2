// Copyright (c) Contributors to the manifest-split project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;
use sha1::{Digest, Sha1};

use super::*;

fn independent_sha1(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[rstest]
fn test_create_manifest_sha1_element() {
    let manifest = Manifest::parse("<manifest></manifest>").unwrap();
    let expected = independent_sha1(b"<manifest />");

    let element = create_manifest_hash_element(&manifest, "test_manifest");
    assert_eq!(
        element.to_xml_string(),
        format!(r#"<hash name="test_manifest" type="sha1" value="{expected}" />"#)
    );
}

#[rstest]
fn test_digest_is_deterministic() {
    let xml = r#"<manifest>
  <project name="platform/project1" path="system/project1" groups="a,b" />
</manifest>"#;
    let first = Manifest::parse(xml).unwrap();
    let second = Manifest::parse(xml).unwrap();

    assert_eq!(manifest_digest(&first), manifest_digest(&second));
    assert_eq!(
        manifest_digest(&first),
        independent_sha1(&first.to_bytes())
    );
    assert_eq!(manifest_digest(&first).len(), 40);
}

#[rstest]
fn test_append_hashes_content_before_insertion() {
    let mut manifest =
        Manifest::parse(r#"<manifest><project name="a" path="a" /></manifest>"#).unwrap();
    let before = manifest.to_bytes();

    let digest = append_manifest_hash(&mut manifest, "default.xml");

    assert_eq!(digest, independent_sha1(&before));
    let last = manifest.root().child_elements().last().unwrap();
    assert_eq!(last.name, "hash");
    assert_eq!(last.attribute("value"), Some(digest.as_str()));
    assert_eq!(
        manifest.root().to_xml_string(),
        format!(
            r#"<manifest><project name="a" path="a" /><hash name="default.xml" type="sha1" value="{digest}" /></manifest>"#
        )
    );
}

#[rstest]
fn test_verify_round_trip() {
    let mut manifest =
        Manifest::parse("<manifest>\n  <project name=\"a\" path=\"a\" />\n</manifest>").unwrap();
    let digest = append_manifest_hash(&mut manifest, "split.xml");

    // Verification works on the reloaded document too.
    let reloaded = Manifest::parse(&manifest.to_document_string()).unwrap();
    assert_eq!(
        verify_manifest_hash(&reloaded),
        HashCheck::Verified {
            name: "split.xml".to_string(),
            digest,
        }
    );
}

#[rstest]
fn test_verify_detects_tampering() {
    let mut manifest = Manifest::parse(r#"<manifest><project name="a" /></manifest>"#).unwrap();
    append_manifest_hash(&mut manifest, "m");

    manifest
        .root_mut()
        .children
        .insert(0, Node::Element(Element::new("project").with_attribute("name", "b")));

    match verify_manifest_hash(&manifest) {
        HashCheck::Mismatch { name, .. } => assert_eq!(name, "m"),
        other => panic!("Expected Mismatch, got: {:?}", other),
    }
}

#[rstest]
#[case("<manifest><project name=\"a\" /></manifest>", HashCheck::Missing)]
#[case(
    "<manifest><hash name=\"m\" type=\"sha1\" value=\"00\" /><project name=\"a\" /></manifest>",
    HashCheck::Missing
)]
#[case(
    "<manifest><hash name=\"m\" type=\"md5\" value=\"00\" /></manifest>",
    HashCheck::UnsupportedType("md5".to_string())
)]
fn test_verify_without_usable_hash(#[case] xml: &str, #[case] expected: HashCheck) {
    let manifest = Manifest::parse(xml).unwrap();
    assert_eq!(verify_manifest_hash(&manifest), expected);
    assert!(!verify_manifest_hash(&manifest).is_verified());
}

#[rstest]
fn test_remove_manifest_hash() {
    let mut manifest = Manifest::parse(r#"<manifest><project name="a" /></manifest>"#).unwrap();
    let original = manifest.clone();
    append_manifest_hash(&mut manifest, "m");

    assert_eq!(remove_manifest_hash(&mut manifest), 1);
    assert_eq!(manifest, original);
    assert_eq!(remove_manifest_hash(&mut manifest), 0);
}
