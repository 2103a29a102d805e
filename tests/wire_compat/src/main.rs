fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use worldtray_launcher::LauncherData;
    use worldtray_protocol::{PeopleFile, Uid, WorldStatus, WorldStatusSet};

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and compares
    /// the JSON values (key order is irrelevant).
    fn roundtrip_test<T>(name: &str)
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  fixture: {fixture}\n  Rust:    {reserialized}"
        );
    }

    // --- API responses ---

    #[test]
    fn fixture_people_file() {
        let fixture = load_fixture("people.json");
        let people: PeopleFile = serde_json::from_value(fixture).unwrap();

        assert_eq!(people.people.len(), 3);
        assert_eq!(
            people.people[&Uid::from("alice")].name.as_deref(),
            Some("Alice")
        );
        assert!(people.people[&Uid::from("86841168427495424")].name.is_none());
    }

    #[test]
    fn people_file_with_unknown_version_is_rejected() {
        let mut fixture = load_fixture("people.json");
        fixture["version"] = serde_json::json!(4);
        let err = serde_json::from_value::<PeopleFile>(fixture).unwrap_err();
        assert!(err.to_string().contains("version 4"));
    }

    #[test]
    fn fixture_world_statuses() {
        roundtrip_test::<WorldStatusSet>("worlds.json");

        let worlds: WorldStatusSet = serde_json::from_value(load_fixture("worlds.json")).unwrap();
        assert_eq!(
            worlds.keys().collect::<Vec<_>>(),
            ["creative", "modded", "wurstmineberg"]
        );
        assert!(worlds["modded"].version.is_none());
        assert!(!worlds["creative"].running);
    }

    #[test]
    fn fixture_single_world_status() {
        roundtrip_test::<WorldStatus>("status.json");
    }

    #[test]
    fn numeric_uids_in_player_list() {
        let status: WorldStatus =
            serde_json::from_str(r#"{"version":"1.20.4","running":true,"list":[86841168427495424]}"#)
                .unwrap();
        assert_eq!(status.list, [Uid::from("86841168427495424")]);
    }

    // --- Launcher profile store ---

    #[test]
    fn fixture_launcher_profiles() {
        roundtrip_test::<LauncherData>("launcher_profiles.json");
    }

    #[test]
    fn launcher_profiles_keep_unknown_fields_after_edit() {
        let fixture = load_fixture("launcher_profiles.json");
        let mut data: LauncherData = serde_json::from_value(fixture.clone()).unwrap();
        data.profiles
            .get_mut("3f1c2e4d5a6b7c8d9e0f1a2b3c4d5e6f")
            .unwrap()
            .last_version_id = Some("1.21".into());

        let mut expected = fixture;
        expected["profiles"]["3f1c2e4d5a6b7c8d9e0f1a2b3c4d5e6f"]["lastVersionId"] =
            serde_json::json!("1.21");
        assert_eq!(serde_json::to_value(&data).unwrap(), expected);
    }
}
