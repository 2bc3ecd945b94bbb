use super::*;
use crate::assets::source::{MemoryAssetSource, Variant};

#[test]
fn loader_delivers_every_request() {
    let src = MemoryAssetSource::new()
        .with(AssetKey::part(0, Variant::Guide), "roots", b"a".to_vec())
        .with(AssetKey::part(0, Variant::Fillable), "roots", b"b".to_vec());
    let requests = vec![
        (AssetKey::part(0, Variant::Guide), "roots".to_string()),
        (AssetKey::part(0, Variant::Fillable), "roots".to_string()),
        (AssetKey::Frame, "frame".to_string()),
    ];

    let mut loader = AssetLoader::spawn(Arc::new(src), requests);
    let mut got = Vec::new();
    while !loader.is_done() {
        if let Some(f) = loader.recv_timeout(Duration::from_secs(5)) {
            got.push(f);
        } else {
            panic!("loader stalled");
        }
    }
    assert_eq!(got.len(), 3);
    assert_eq!(got[0].bytes.as_deref().unwrap(), b"a");
    assert!(got[2].bytes.is_err());
    assert!(loader.drain().is_empty());
}

#[test]
fn empty_request_list_is_done_immediately() {
    let loader = AssetLoader::spawn(Arc::new(MemoryAssetSource::new()), Vec::new());
    assert!(loader.is_done());
}
