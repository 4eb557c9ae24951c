use super::types::{SelectionConfig, SelectionOverrides};
use crate::utils::{Error, Result};
use std::collections::BTreeMap;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct SlimProfile {
    pub name: String,
    pub title: String,
    pub overrides: SelectionOverrides,
}

impl SlimProfile {
    pub fn from_raw(name: String, overrides: SelectionOverrides) -> Self {
        let title = overrides.title.clone().unwrap_or_else(|| name.clone());
        Self {
            name,
            title,
            overrides,
        }
    }

    /// The selection this profile produces on top of `base`.
    pub fn resolve(&self, base: &SelectionConfig) -> SelectionConfig {
        let mut selection = base.clone();
        self.overrides.apply(&mut selection);
        selection
    }
}

/// Built-in profiles plus those from the config file. A config profile with
/// a built-in's name replaces it.
pub struct SlimProfileManager {
    profiles: BTreeMap<String, SlimProfile>,
}

impl SlimProfileManager {
    pub fn new(raw_profiles: &HashMap<String, SelectionOverrides>) -> Self {
        let mut profiles = Self::builtin_profiles();

        for (name, overrides) in raw_profiles {
            debug!("Loaded profile '{}' from configuration", name);
            profiles.insert(
                name.clone(),
                SlimProfile::from_raw(name.clone(), overrides.clone()),
            );
        }

        Self { profiles }
    }

    pub fn get_profile(&self, name: &str) -> Result<&SlimProfile> {
        self.profiles.get(name).ok_or_else(|| {
            Error::profile(format!(
                "Profile '{}' not found. Available profiles: {}",
                name,
                self.list_profile_names().join(", ")
            ))
        })
    }

    pub fn list_profiles(&self) -> impl Iterator<Item = &SlimProfile> {
        self.profiles.values()
    }

    /// Sorted by name.
    pub fn list_profile_names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    fn builtin_profiles() -> BTreeMap<String, SlimProfile> {
        let strings = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>();

        let builtins = [
            (
                "default",
                SelectionOverrides {
                    title: Some("Configured defaults".to_string()),
                    ..Default::default()
                },
            ),
            (
                "english_only",
                SelectionOverrides {
                    title: Some("English audio and subtitles only".to_string()),
                    languages: Some(strings(&["eng"])),
                    no_language: Some(false),
                    include_other_audio: Some(false),
                    ..Default::default()
                },
            ),
            (
                "multilang",
                SelectionOverrides {
                    title: Some("English and Japanese, untagged tracks kept".to_string()),
                    languages: Some(strings(&["eng", "jpn"])),
                    no_language: Some(true),
                    ..Default::default()
                },
            ),
            (
                "archival",
                SelectionOverrides {
                    title: Some(
                        "Keep commentary and untagged tracks, copy every common codec".to_string(),
                    ),
                    no_language: Some(true),
                    include_other_audio: Some(true),
                    video_codecs: Some(strings(&[
                        "hevc", "h264", "av1", "vp9", "mpeg2video", "vc1",
                    ])),
                    audio_codecs: Some(strings(&[
                        "truehd", "dts", "eac3", "ac3", "flac", "aac", "opus", "pcm_s16le",
                        "pcm_s24le", "mp3",
                    ])),
                    ..Default::default()
                },
            ),
            (
                "text_subs",
                SelectionOverrides {
                    title: Some("Only text-based subtitles".to_string()),
                    keep_subtitle_codecs: Some(strings(&["subrip", "ass", "mov_text"])),
                    subtitle_codecs: Some(strings(&["ass", "subrip", "mov_text"])),
                    ..Default::default()
                },
            ),
        ];

        builtins
            .into_iter()
            .map(|(name, overrides)| {
                (
                    name.to_string(),
                    SlimProfile::from_raw(name.to_string(), overrides),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::OperationKind;

    #[test]
    fn test_builtin_profiles_are_available() {
        let manager = SlimProfileManager::new(&HashMap::new());
        assert_eq!(
            manager.list_profile_names(),
            vec!["archival", "default", "english_only", "multilang", "text_subs"]
        );
        assert!(manager.get_profile("missing").is_err());
    }

    #[test]
    fn test_config_profiles_replace_builtins() {
        let mut raw = HashMap::new();
        raw.insert(
            "default".to_string(),
            SelectionOverrides {
                languages: Some(vec!["ger".to_string()]),
                ..Default::default()
            },
        );
        let manager = SlimProfileManager::new(&raw);

        let profile = manager.get_profile("default").unwrap();
        assert_eq!(profile.title, "default");
        assert_eq!(
            profile.resolve(&SelectionConfig::default()).languages,
            vec!["ger"]
        );
    }

    #[test]
    fn test_default_profile_keeps_base_selection() {
        let manager = SlimProfileManager::new(&HashMap::new());
        let base = SelectionConfig::default();
        assert_eq!(manager.get_profile("default").unwrap().resolve(&base), base);
    }

    #[test]
    fn test_multilang_resolution() {
        let manager = SlimProfileManager::new(&HashMap::new());
        let selection = manager
            .get_profile("multilang")
            .unwrap()
            .resolve(&SelectionConfig::default());

        assert_eq!(selection.languages, vec!["eng", "jpn"]);
        assert!(selection.no_language);
        assert!(!selection.include_other_audio);
    }

    #[test]
    fn test_archival_still_converts_unlisted_codecs() {
        let manager = SlimProfileManager::new(&HashMap::new());
        let profile = manager.get_profile("archival").unwrap();
        let options = profile.resolve(&SelectionConfig::default()).to_plan_options();

        assert!(!profile.title.contains("never"));
        assert_eq!(options.audio.resolve("mp3"), OperationKind::Copy);
        assert_ne!(options.audio.resolve("wmav2"), OperationKind::Copy);
    }
}
