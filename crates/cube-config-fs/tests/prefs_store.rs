// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Client prefs persisted through the filesystem store.

use cube_app_core::config::{ConfigError, ConfigService, ConfigStore};
use cube_app_core::config_port::ConfigPort;
use cube_app_core::prefs::ClientPrefs;
use cube_config_fs::FsConfigStore;

#[test]
fn missing_key_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsConfigStore::with_base(dir.path()).unwrap();
    assert!(matches!(store.load_raw("nope"), Err(ConfigError::NotFound)));
}

#[test]
fn prefs_round_trip_through_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let svc = ConfigService::new(FsConfigStore::with_base(dir.path().join("nested")).unwrap());
    assert_eq!(svc.load_prefs(), None);

    let prefs = ClientPrefs {
        server_url: "ws://vision.local:9000".into(),
        surface_width: 640,
        frame_interval_ms: 50,
        default_size: Some(4),
        frames_dir: Some(dir.path().join("frames")),
    };
    svc.save_prefs(&prefs);
    assert_eq!(svc.load_prefs(), Some(prefs));
    assert!(dir.path().join("nested/client_prefs.json").is_file());
}

#[test]
fn unreadable_prefs_fall_back_to_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsConfigStore::with_base(dir.path()).unwrap();
    store.save_raw("client_prefs", b"[1, 2").unwrap();
    let svc = ConfigService::new(store);
    assert_eq!(svc.load_prefs(), None);
}
