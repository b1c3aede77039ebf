//! Core types for the cook database: platforms, root directories, and file types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp: whole seconds since the Unix epoch
pub type Timestamp = u64;

/// Target platform a cooked tree is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(alias = "pc", alias = "PC")]
    Pc,
    #[serde(alias = "ios", alias = "IOS")]
    Ios,
    #[serde(alias = "android")]
    Android,
    #[serde(alias = "linux")]
    Linux,
}

impl Platform {
    pub const ALL: [Platform; 4] = [Platform::Pc, Platform::Ios, Platform::Android, Platform::Linux];

    /// Display name, e.g. "PC"
    pub fn name(self) -> &'static str {
        match self {
            Platform::Pc => "PC",
            Platform::Ios => "IOS",
            Platform::Android => "Android",
            Platform::Linux => "Linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown platform: {}", s))
    }
}

/// Logical root directory of an asset path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum GameDirectory {
    Unknown,
    Config,
    Content,
    Log,
    Save,
    ToolsBin,
    Videos,
}

impl GameDirectory {
    pub const ALL: [GameDirectory; 7] = [
        GameDirectory::Unknown,
        GameDirectory::Config,
        GameDirectory::Content,
        GameDirectory::Log,
        GameDirectory::Save,
        GameDirectory::ToolsBin,
        GameDirectory::Videos,
    ];

    /// URL scheme used in the serialized form of a path
    pub fn scheme(self) -> &'static str {
        match self {
            GameDirectory::Unknown => "",
            GameDirectory::Config => "config",
            GameDirectory::Content => "content",
            GameDirectory::Log => "log",
            GameDirectory::Save => "save",
            GameDirectory::ToolsBin => "tools",
            GameDirectory::Videos => "videos",
        }
    }

    pub fn from_scheme(scheme: &str) -> Option<Self> {
        GameDirectory::ALL
            .iter()
            .copied()
            .find(|d| *d != GameDirectory::Unknown && d.scheme().eq_ignore_ascii_case(scheme))
    }
}

/// Kind of asset file, selected by extension
///
/// New variants go at the end; the discriminant is part of the on-disk
/// version table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FileType {
    Unknown,
    Animation2D,
    Csv,
    Effect,
    EffectHeader,
    Exe,
    Font,
    FxBank,
    Html,
    Json,
    PemCertificate,
    Protobuf,
    SaveGame,
    SceneAsset,
    ScenePrefab,
    Script,
    SoundBank,
    SoundProject,
    Texture0,
    Texture1,
    Texture2,
    Texture3,
    Texture4,
    Text,
    UiMovie,
    Wav,
    Xml,
    ScriptProject,
    Cs,
    Video,
}

/// Number of file types, including `Unknown`
pub const FILE_TYPE_COUNT: usize = 30;

const ALL_FILE_TYPES: [FileType; FILE_TYPE_COUNT] = [
    FileType::Unknown,
    FileType::Animation2D,
    FileType::Csv,
    FileType::Effect,
    FileType::EffectHeader,
    FileType::Exe,
    FileType::Font,
    FileType::FxBank,
    FileType::Html,
    FileType::Json,
    FileType::PemCertificate,
    FileType::Protobuf,
    FileType::SaveGame,
    FileType::SceneAsset,
    FileType::ScenePrefab,
    FileType::Script,
    FileType::SoundBank,
    FileType::SoundProject,
    FileType::Texture0,
    FileType::Texture1,
    FileType::Texture2,
    FileType::Texture3,
    FileType::Texture4,
    FileType::Text,
    FileType::UiMovie,
    FileType::Wav,
    FileType::Xml,
    FileType::ScriptProject,
    FileType::Cs,
    FileType::Video,
];

/// Extension lookup table. Several extensions map to one type; legacy
/// extensions are kept so old trees still resolve.
const EXTENSIONS: &[(&str, FileType)] = &[
    (".avi", FileType::Video),
    (".bank", FileType::SoundBank),
    (".cs", FileType::Cs),
    (".csp", FileType::ScriptProject),
    (".csproj", FileType::ScriptProject),
    (".csv", FileType::Csv),
    (".dat", FileType::SaveGame),
    (".exe", FileType::Exe),
    (".fbx", FileType::SceneAsset),
    (".fcn", FileType::UiMovie),
    (".fdp", FileType::SoundProject),
    (".fev", FileType::SoundProject),
    (".fsb", FileType::SoundBank),
    (".fspro", FileType::SoundProject),
    (".fx", FileType::Effect),
    (".fxb", FileType::FxBank),
    (".fxc", FileType::Effect),
    (".fxh", FileType::EffectHeader),
    (".fxh_marker", FileType::EffectHeader),
    (".html", FileType::Html),
    (".json", FileType::Json),
    (".lua", FileType::Script),
    (".lbc", FileType::Script),
    (".prefab", FileType::ScenePrefab),
    (".pb", FileType::Protobuf),
    (".pem", FileType::PemCertificate),
    (".png", FileType::Texture0),
    (".proto", FileType::Protobuf),
    (".saf", FileType::Animation2D),
    (".sff", FileType::Font),
    (".spf", FileType::ScenePrefab),
    (".sif0", FileType::Texture0),
    (".sif1", FileType::Texture1),
    (".sif2", FileType::Texture2),
    (".sif3", FileType::Texture3),
    (".sif4", FileType::Texture4),
    (".son", FileType::Animation2D),
    (".ssa", FileType::SceneAsset),
    (".swf", FileType::UiMovie),
    (".ttf", FileType::Font),
    (".txt", FileType::Text),
    (".wav", FileType::Wav),
    (".xfx", FileType::FxBank),
    (".xml", FileType::Xml),
];

impl FileType {
    pub fn all() -> &'static [FileType] {
        &ALL_FILE_TYPES
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        ALL_FILE_TYPES.get(index).copied()
    }

    /// Resolve a lowercase extension (with leading '.') to a file type.
    pub fn from_extension(extension: &str) -> FileType {
        EXTENSIONS
            .iter()
            .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
            .map(|(_, t)| *t)
            .unwrap_or(FileType::Unknown)
    }

    /// Extension of the file in the source tree
    pub fn source_extension(self) -> &'static str {
        match self {
            FileType::Unknown => "",
            FileType::Animation2D => ".son",
            FileType::Cs => ".cs",
            FileType::Csv => ".csv",
            FileType::Effect => ".fx",
            FileType::EffectHeader => ".fxh",
            FileType::Exe => ".exe",
            FileType::Font => ".ttf",
            FileType::FxBank => ".xfx",
            FileType::Html => ".html",
            FileType::Json => ".json",
            FileType::PemCertificate => ".pem",
            FileType::Protobuf => ".proto",
            FileType::SaveGame => ".dat",
            FileType::SceneAsset => ".fbx",
            FileType::ScenePrefab => ".prefab",
            FileType::Script => ".lua",
            FileType::ScriptProject => ".csproj",
            FileType::SoundBank => ".bank",
            FileType::SoundProject => ".fspro",
            FileType::Text => ".txt",
            FileType::Texture0
            | FileType::Texture1
            | FileType::Texture2
            | FileType::Texture3
            | FileType::Texture4 => ".png",
            FileType::UiMovie => ".swf",
            FileType::Video => ".avi",
            FileType::Wav => ".wav",
            FileType::Xml => ".xml",
        }
    }

    /// Extension of the file in a platform's cooked tree
    pub fn cooked_extension(self) -> &'static str {
        match self {
            FileType::Unknown => "",
            FileType::Animation2D => ".saf",
            FileType::Cs => ".cs",
            FileType::Csv => ".csv",
            FileType::Effect => ".fxc",
            FileType::EffectHeader => ".fxh_marker",
            FileType::Exe => ".exe",
            FileType::Font => ".sff",
            FileType::FxBank => ".fxb",
            FileType::Html => ".html",
            FileType::Json => ".json",
            FileType::PemCertificate => ".pem",
            FileType::Protobuf => ".pb",
            FileType::SaveGame => ".dat",
            FileType::SceneAsset => ".ssa",
            FileType::ScenePrefab => ".spf",
            FileType::Script => ".lbc",
            FileType::ScriptProject => ".csp",
            FileType::SoundBank => ".bank",
            FileType::SoundProject => ".fev",
            FileType::Texture0 => ".sif0",
            FileType::Texture1 => ".sif1",
            FileType::Texture2 => ".sif2",
            FileType::Texture3 => ".sif3",
            FileType::Texture4 => ".sif4",
            FileType::Text => ".txt",
            FileType::UiMovie => ".fcn",
            FileType::Video => ".avi",
            FileType::Wav => ".wav",
            FileType::Xml => ".xml",
        }
    }

    pub fn is_texture(self) -> bool {
        matches!(
            self,
            FileType::Texture0
                | FileType::Texture1
                | FileType::Texture2
                | FileType::Texture3
                | FileType::Texture4
        )
    }

    /// All texture mip-level types, lowest first
    pub fn texture_types() -> [FileType; 5] {
        [
            FileType::Texture0,
            FileType::Texture1,
            FileType::Texture2,
            FileType::Texture3,
            FileType::Texture4,
        ]
    }

    /// True for types that are produced by the cooker rather than copied.
    pub fn needs_cooking(self) -> bool {
        matches!(
            self,
            FileType::Animation2D
                | FileType::Effect
                | FileType::Font
                | FileType::FxBank
                | FileType::Protobuf
                | FileType::Script
                | FileType::ScriptProject
                | FileType::SceneAsset
                | FileType::ScenePrefab
                | FileType::SoundProject
                | FileType::UiMovie
        ) || self.is_texture()
    }
}
