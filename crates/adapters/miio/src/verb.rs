//! FM request verbs understood by the gateway.

use std::fmt;

/// Value of `current_status` while the radio plays.
pub const STATUS_RUNNING: &str = "run";

/// Request verbs of the gateway FM radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FmVerb {
    /// Status (`current_status`, `current_volume`, `current_program`, …).
    GetPropFm,
    /// Switch playback: `["on"]` or `["off"]`.
    PlayFm,
    /// Tune a channel: `{"id": <channel id>, "type": 0}`.
    PlaySpecifyFm,
    /// Set volume: `["<volume>"]`.
    VolumeCtrlFm,
    /// Channel list, paged with `{"start": <offset>}`.
    GetChannels,
    GetMusicFreeSpace,
}

impl FmVerb {
    pub const ALL: [Self; 6] = [
        Self::GetPropFm,
        Self::PlayFm,
        Self::PlaySpecifyFm,
        Self::VolumeCtrlFm,
        Self::GetChannels,
        Self::GetMusicFreeSpace,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetPropFm => "get_prop_fm",
            Self::PlayFm => "play_fm",
            Self::PlaySpecifyFm => "play_specify_fm",
            Self::VolumeCtrlFm => "volume_ctrl_fm",
            Self::GetChannels => "get_channels",
            Self::GetMusicFreeSpace => "get_music_free_space",
        }
    }

    /// Look a verb up by its wire name.
    #[must_use]
    pub fn from_method(method: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|verb| verb.as_str() == method)
    }
}

impl fmt::Display for FmVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
