//! The DeoVR manifest: schema types and assembly.
//!
//! The JSON shape here is the binding contract with the DeoVR player's
//! "multiple videos deeplink" format — field names and nesting must match
//! exactly or the client refuses the library. See
//! <https://deovr.com/app/doc#multiple-videos-deeplink>.
//!
//! [`Manifest::assemble`] turns a filtered set of [`MediaFile`] records
//! into the manifest: scenes are sorted by relative path (so output is
//! deterministic and reruns over an unchanged tree are byte-identical) and
//! grouped into per-tab scene lists by the top-level subdirectory beneath
//! the library root.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::media::MediaFile;
use crate::settings::Settings;

/// Group name for files sitting directly in the library root.
pub const ROOT_GROUP: &str = "Library";

/// Stereo layout of a scene, serialized with DeoVR's tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StereoMode {
    /// Monoscopic footage.
    #[serde(rename = "off")]
    Monoscopic,
    /// Side-by-side stereo (the common VR layout, and the default).
    #[default]
    #[serde(rename = "sbs")]
    SideBySide,
    /// Top-bottom stereo.
    #[serde(rename = "tb")]
    TopBottom,
    /// Custom UV mapping.
    #[serde(rename = "cuv")]
    CustomUv,
}

/// Projection of a scene, serialized with DeoVR's tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScreenType {
    /// Flat (non-VR) footage.
    #[serde(rename = "flat")]
    Flat,
    /// 180° equirectangular dome (the default).
    #[default]
    #[serde(rename = "dome")]
    Dome,
    /// 360° equirectangular sphere.
    #[serde(rename = "sphere")]
    Sphere,
    /// 180° fisheye.
    #[serde(rename = "fisheye")]
    Fisheye,
    /// 190° fisheye (RF52 lenses).
    #[serde(rename = "rf52")]
    Fisheye190,
    /// 200° fisheye (MKX200 lenses).
    #[serde(rename = "mkx200")]
    Fisheye200,
}

/// A single playable entry in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Display title; the file's base name without extension.
    pub title: String,
    /// Duration in whole seconds.
    #[serde(rename = "videoLength")]
    pub video_length: u64,
    /// Streamable URL of the video file.
    pub video_url: String,
    /// Optional thumbnail; omitted entirely when unset.
    #[serde(rename = "thumbnailUrl", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Always `true`; DeoVR treats entries as stereo by default.
    pub is3d: bool,
    /// Stereo layout token.
    #[serde(rename = "stereoMode")]
    pub stereo_mode: StereoMode,
    /// Projection token.
    #[serde(rename = "screenType")]
    pub screen_type: ScreenType,
}

/// A named tab of scenes in the DeoVR browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneGroup {
    /// Tab name shown by the player.
    pub name: String,
    /// Scenes in this tab, ordered by relative path.
    pub list: Vec<Scene>,
}

/// The complete library manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Scene groups, ordered by name.
    pub scenes: Vec<SceneGroup>,
}

impl Manifest {
    /// Assemble a manifest from filtered media files.
    ///
    /// Files are sorted by relative path so the result is a pure function
    /// of directory state and settings. Each file lands in the group named
    /// after its top-level subdirectory; files directly in the root land
    /// in [`ROOT_GROUP`]. Groups come out in name order.
    pub fn assemble(files: &[MediaFile], settings: &Settings) -> Self {
        let mut sorted: Vec<&MediaFile> = files.iter().collect();
        sorted.sort_by(|a, b| a.relative.cmp(&b.relative));

        let mut groups: BTreeMap<String, Vec<Scene>> = BTreeMap::new();
        for file in sorted {
            groups
                .entry(category_for(&file.relative))
                .or_default()
                .push(scene_for(file, settings));
        }

        Self {
            scenes: groups
                .into_iter()
                .map(|(name, list)| SceneGroup { name, list })
                .collect(),
        }
    }

    /// Total number of scenes across all groups.
    pub fn scene_count(&self) -> usize {
        self.scenes.iter().map(|group| group.list.len()).sum()
    }
}

fn scene_for(file: &MediaFile, settings: &Settings) -> Scene {
    Scene {
        title: file.title(),
        video_length: file.duration_secs as u64,
        video_url: video_url(&file.relative, settings.base_url.as_deref()),
        thumbnail_url: settings.thumbnail_url.clone(),
        is3d: true,
        stereo_mode: settings.stereo_mode,
        screen_type: settings.screen_type,
    }
}

/// Category a relative path belongs to: its top-level directory, or
/// [`ROOT_GROUP`] for files directly under the root.
fn category_for(relative: &Path) -> String {
    let mut components = relative.components();
    let first = components.next();
    match (first, components.next()) {
        (Some(dir), Some(_)) => dir.as_os_str().to_string_lossy().into_owned(),
        _ => ROOT_GROUP.to_string(),
    }
}

/// Build the URL for a video from its root-relative path.
///
/// Every path segment is percent-encoded and segments are rejoined with
/// `/`. With a base URL the result is absolute (trailing slash on the base
/// tolerated); without one it is the encoded relative path, which the
/// player resolves against the manifest's own URL.
pub fn video_url(relative: &Path, base_url: Option<&str>) -> String {
    let encoded = relative
        .components()
        .map(|c| encode_segment(&c.as_os_str().to_string_lossy()))
        .collect::<Vec<_>>()
        .join("/");

    match base_url {
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), encoded),
        None => encoded,
    }
}

/// Percent-encoding for a single URL path segment.
///
/// RFC 3986 unreserved characters pass through; everything else, spaces
/// included, becomes `%XX`.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => {
                out.push('%');
                out.push(char::from(HEX[(byte >> 4) as usize]));
                out.push(char::from(HEX[(byte & 0x0f) as usize]));
            }
        }
    }
    out
}

const HEX: [u8; 16] = *b"0123456789ABCDEF";

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{category_for, encode_segment, video_url, Manifest, ROOT_GROUP};
    use crate::media::MediaFile;
    use crate::probe::VideoMetadata;
    use crate::settings::Settings;

    fn media_file(relative: &str, duration_secs: f64) -> MediaFile {
        MediaFile::new(
            Path::new("/library"),
            PathBuf::from("/library").join(relative),
            64 * 1024 * 1024,
            VideoMetadata {
                duration_secs,
                width: 3840,
                height: 1920,
                codec: "h264".into(),
            },
        )
    }

    #[test]
    fn segments_encode_rfc3986_unreserved() {
        assert_eq!(encode_segment("Some Film.mp4"), "Some%20Film.mp4");
        assert_eq!(encode_segment("a+b&c.mp4"), "a%2Bb%26c.mp4");
        assert_eq!(encode_segment("plain-name_1.mp4"), "plain-name_1.mp4");
    }

    #[test]
    fn urls_join_base_and_escape_segments() {
        let relative = Path::new("movies/Some Film.mp4");
        assert_eq!(
            video_url(relative, Some("http://example.com/vr/")),
            "http://example.com/vr/movies/Some%20Film.mp4"
        );
        assert_eq!(video_url(relative, None), "movies/Some%20Film.mp4");
    }

    #[test]
    fn category_is_top_level_directory() {
        assert_eq!(category_for(Path::new("movies/deep/a.mp4")), "movies");
        assert_eq!(category_for(Path::new("a.mp4")), ROOT_GROUP);
    }

    #[test]
    fn assemble_groups_and_sorts() {
        let settings = Settings::new("/library");
        let files = vec![
            media_file("movies/z.mp4", 90.0),
            media_file("clips/b.mp4", 70.0),
            media_file("movies/a.mp4", 80.0),
            media_file("top.mp4", 61.0),
        ];

        let manifest = Manifest::assemble(&files, &settings);
        let names: Vec<&str> = manifest.scenes.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Library", "clips", "movies"]);

        let movies = &manifest.scenes[2];
        assert_eq!(movies.list[0].title, "a");
        assert_eq!(movies.list[1].title, "z");
        assert_eq!(manifest.scene_count(), 4);
    }

    #[test]
    fn scene_json_matches_the_deovr_schema() {
        let settings = Settings::new("/library").with_base_url("http://example.com");
        let manifest = Manifest::assemble(&[media_file("movies/a.mp4", 95.7)], &settings);

        let value = serde_json::to_value(&manifest).unwrap();
        let scene = &value["scenes"][0]["list"][0];
        assert_eq!(value["scenes"][0]["name"], "movies");
        assert_eq!(scene["title"], "a");
        assert_eq!(scene["videoLength"], 95);
        assert_eq!(scene["video_url"], "http://example.com/movies/a.mp4");
        assert_eq!(scene["is3d"], true);
        assert_eq!(scene["stereoMode"], "sbs");
        assert_eq!(scene["screenType"], "dome");
        // Unset thumbnail must be absent, not null.
        assert!(scene.get("thumbnailUrl").is_none());
    }

    #[test]
    fn thumbnail_is_emitted_when_configured() {
        let settings =
            Settings::new("/library").with_thumbnail_url("http://example.com/thumb.png");
        let manifest = Manifest::assemble(&[media_file("a.mp4", 90.0)], &settings);
        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(
            value["scenes"][0]["list"][0]["thumbnailUrl"],
            "http://example.com/thumb.png"
        );
    }

    #[test]
    fn manifest_round_trips_through_serde() {
        let settings = Settings::new("/library");
        let manifest = Manifest::assemble(&[media_file("movies/a.mp4", 90.0)], &settings);
        let json = serde_json::to_string(&manifest).unwrap();
        let parsed: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, manifest);
    }
}
