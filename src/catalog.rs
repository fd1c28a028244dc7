/// Compiled-in sound catalog
///
/// Every logical name the game can ask for, the background music track,
/// the variant groups and the conflict groups. The variant and conflict
/// tables are authored independently: a conflict group is not derived from
/// a variant group, so adding an alias means touching both tables.

/// Logical name of the looping background music resource.
pub const MUSIC_NAME: &str = "musica-fondo";

/// Background music plays at this fraction of the global volume.
pub const MUSIC_ATTENUATION: f32 = 0.2;

/// Every sound-effect resource probed at startup.
pub const SOUND_NAMES: &[&str] = &[
    "acierto",
    "error1",
    "error2",
    "click",
    "pasar-pagina",
    "tiempo-agotado",
    "victoria1",
    "victoria2",
    "victoria3",
    "victoria-nivel",
    "derrota",
];

/// Group name -> interchangeable resources, one picked at random per trigger.
pub const VARIANT_GROUPS: &[(&str, &[&str])] = &[
    ("victoria", &["victoria1", "victoria2", "victoria3"]),
    ("error", &["error1", "error2"]),
];

/// Trigger name -> resources halted before the trigger plays.
///
/// Names not listed here only conflict with themselves.
pub const CONFLICT_GROUPS: &[(&str, &[&str])] = &[
    (
        "victoria",
        &["victoria1", "victoria2", "victoria3", "victoria-nivel"],
    ),
    (
        "victoria-nivel",
        &["victoria1", "victoria2", "victoria3", "victoria-nivel"],
    ),
    ("error", &["error1", "error2"]),
];

/// Identifier the asset provider is queried with for a logical name.
pub fn asset_id(name: &str) -> String {
    format!("sound-{}", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_is_prefixed() {
        assert_eq!(asset_id("acierto"), "sound-acierto");
        assert_eq!(asset_id(MUSIC_NAME), "sound-musica-fondo");
    }

    #[test]
    fn test_variant_members_are_known_sounds() {
        for (group, members) in VARIANT_GROUPS {
            assert!(!members.is_empty(), "variant group {} is empty", group);
            for member in *members {
                assert!(SOUND_NAMES.contains(member), "unknown member {}", member);
            }
        }
    }

    #[test]
    fn test_conflict_members_are_known_sounds() {
        for (_, members) in CONFLICT_GROUPS {
            for member in *members {
                assert!(SOUND_NAMES.contains(member), "unknown member {}", member);
            }
        }
    }

    #[test]
    fn test_music_is_not_a_sound_effect() {
        assert!(!SOUND_NAMES.contains(&MUSIC_NAME));
    }
}
