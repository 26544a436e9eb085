// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the speaker datablock, an emitter of sound placed through objects.

use super::{AnimData, SoundId};
use linkage_core::datablock::{Datablock, IdCode, IdHeader};

/// Per-speaker option bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpeakerFlags {
    bits: u16,
}

impl SpeakerFlags {
    /// No options set.
    pub const NONE: Self = Self { bits: 0 };
    /// The speaker's channel is expanded in the dopesheet.
    pub const DS_EXPAND: Self = Self { bits: 1 << 0 };
    /// The speaker is muted.
    pub const MUTED: Self = Self { bits: 1 << 1 };
    /// Distances are relative to the listener.
    pub const RELATIVE: Self = Self { bits: 1 << 2 };

    /// Returns the raw bits.
    pub const fn bits(&self) -> u16 {
        self.bits
    }

    /// Returns `true` if every bit of `other` is set.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Returns `true` if no bit is set.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl std::ops::BitOr for SpeakerFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

impl std::ops::BitOrAssign for SpeakerFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

/// The audio payload of a speaker, copied by value on duplication.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeakerSettings {
    /// How strongly the volume falls off with distance.
    pub attenuation: f32,
    /// Angle of the inner cone, in degrees. Full volume inside it.
    pub cone_angle_inner: f32,
    /// Angle of the outer cone, in degrees.
    pub cone_angle_outer: f32,
    /// Volume multiplier outside the outer cone.
    pub cone_volume_outer: f32,
    /// Distance beyond which the speaker is no longer attenuated further.
    pub distance_max: f32,
    /// Distance at which the volume is unattenuated.
    pub distance_reference: f32,
    /// Option bits.
    pub flag: SpeakerFlags,
    /// Playback pitch multiplier.
    pub pitch: f32,
    /// Playback volume.
    pub volume: f32,
    /// Upper volume bound after attenuation.
    pub volume_max: f32,
    /// Lower volume bound after attenuation.
    pub volume_min: f32,
}

impl Default for SpeakerSettings {
    fn default() -> Self {
        Self {
            attenuation: 1.0,
            cone_angle_inner: 360.0,
            cone_angle_outer: 360.0,
            cone_volume_outer: 1.0,
            distance_max: f32::INFINITY,
            distance_reference: 1.0,
            flag: SpeakerFlags::NONE,
            pitch: 1.0,
            volume: 1.0,
            volume_max: 1.0,
            volume_min: 0.0,
        }
    }
}

/// A speaker datablock.
///
/// `sound` is a shared reference, not ownership: whoever sets it increments
/// the sound's user count, and releasing the speaker decrements it.
#[derive(Debug, Clone, PartialEq)]
pub struct Speaker {
    /// Identity header.
    pub id: IdHeader,
    /// Audio payload.
    pub settings: SpeakerSettings,
    /// The sound this speaker plays, if any.
    pub sound: Option<SoundId>,
    /// Animation attached to the speaker's settings.
    pub anim_data: Option<AnimData>,
}

impl Speaker {
    /// Creates a local speaker with default settings and no sound.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: IdHeader::new(name),
            settings: SpeakerSettings::default(),
            sound: None,
            anim_data: None,
        }
    }
}

impl Datablock for Speaker {
    const CODE: IdCode = IdCode::Speaker;

    fn header(&self) -> &IdHeader {
        &self.id
    }

    fn header_mut(&mut self) -> &mut IdHeader {
        &mut self.id
    }

    fn free_extra_data(&mut self) {
        if let Some(anim_data) = self.anim_data.take() {
            log::trace!(
                "Freeing {} animation curve(s) of speaker '{}'",
                anim_data.curves.len(),
                self.id.name
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let speaker = Speaker::new("Speaker");
        let s = speaker.settings;
        assert_eq!(s.attenuation, 1.0);
        assert_eq!(s.cone_angle_inner, 360.0);
        assert_eq!(s.cone_angle_outer, 360.0);
        assert_eq!(s.cone_volume_outer, 1.0);
        assert_eq!(s.distance_max, f32::INFINITY);
        assert_eq!(s.distance_reference, 1.0);
        assert!(s.flag.is_empty());
        assert_eq!(s.pitch, 1.0);
        assert_eq!(s.volume, 1.0);
        assert_eq!((s.volume_min, s.volume_max), (0.0, 1.0));
        assert!(speaker.sound.is_none());
        assert!(speaker.id.is_local());
    }

    #[test]
    fn test_flags_combine() {
        let mut flags = SpeakerFlags::MUTED;
        flags |= SpeakerFlags::RELATIVE;
        assert!(flags.contains(SpeakerFlags::MUTED));
        assert!(flags.contains(SpeakerFlags::RELATIVE));
        assert!(!flags.contains(SpeakerFlags::DS_EXPAND));
        assert_eq!((SpeakerFlags::MUTED | SpeakerFlags::DS_EXPAND).bits(), 0b011);
    }

    #[test]
    fn test_free_extra_data_drops_animation() {
        let mut speaker = Speaker::new("Speaker");
        speaker.anim_data = Some(AnimData::default());
        speaker.free_extra_data();
        assert!(speaker.anim_data.is_none());
    }
}
