//! Audio toggle controller.
//!
//! Tracks the music and sound switches and the current background track, and
//! turns them into calls on an `AudioSink`. Effects are fire-and-forget;
//! music is queued and only started from `update` once both switches allow
//! it and nothing is already playing.

use log::debug;
use serde::Serialize;

use crate::types::{Outputs, SoundRequest};

pub trait AudioSink {
    fn play_once(&mut self, id: &str);
    fn play_looping(&mut self, id: &str);
    fn stop(&mut self);
}

impl AudioSink for Outputs {
    fn play_once(&mut self, id: &str) {
        self.sounds.push(SoundRequest::Once(id.to_string()));
    }

    fn play_looping(&mut self, id: &str) {
        self.sounds.push(SoundRequest::Looping(id.to_string()));
    }

    fn stop(&mut self) {
        self.sounds.push(SoundRequest::Stop);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AudioController {
    music: bool,
    sound: bool,
    track: Option<String>,
    queued: bool,
    playing: bool,
}

impl Default for AudioController {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl AudioController {
    pub fn new(music: bool, sound: bool) -> Self {
        AudioController {
            music,
            sound,
            track: None,
            queued: false,
            playing: false,
        }
    }

    pub fn music(&self) -> bool {
        self.music
    }

    pub fn sound(&self) -> bool {
        self.sound
    }

    pub fn track(&self) -> Option<&str> {
        self.track.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play_effect(&mut self, id: &str, sink: &mut dyn AudioSink) {
        if self.sound {
            debug!("effect {id}");
            sink.play_once(id);
        }
    }

    /// Stop whatever is playing and queue `id` as the background track.
    pub fn play_music(&mut self, id: &str, sink: &mut dyn AudioSink) {
        self.stop(sink);
        self.cue(id);
    }

    /// Queue `id` without touching the sink; used before the first frame.
    pub fn cue(&mut self, id: &str) {
        self.track = Some(id.to_string());
        self.queued = true;
    }

    /// Called once per tick, before anything else touches audio.
    pub fn update(&mut self, sink: &mut dyn AudioSink) {
        if !(self.queued && self.music && self.sound) || self.playing {
            return;
        }
        let Some(track) = &self.track else {
            return;
        };
        debug!("music {track}");
        sink.play_looping(track);
        self.queued = false;
        self.playing = true;
    }

    pub fn set_music(&mut self, on: bool, sink: &mut dyn AudioSink) {
        self.music = on;
        if on {
            self.resume(sink);
        } else {
            self.pause(sink);
        }
    }

    pub fn set_sound(&mut self, on: bool, sink: &mut dyn AudioSink) {
        self.sound = on;
        if on {
            self.set_music(self.music, sink);
        } else {
            self.pause(sink);
        }
    }

    pub fn toggle_music(&mut self, sink: &mut dyn AudioSink) {
        self.set_music(!self.music, sink);
    }

    pub fn toggle_sound(&mut self, sink: &mut dyn AudioSink) {
        self.set_sound(!self.sound, sink);
    }

    pub fn pause(&mut self, sink: &mut dyn AudioSink) {
        sink.stop();
        self.playing = false;
    }

    /// Restart the kept track from the top.
    pub fn resume(&mut self, sink: &mut dyn AudioSink) {
        if self.playing {
            return;
        }
        if let Some(track) = self.track.clone() {
            self.play_music(&track, sink);
        }
    }

    pub fn stop(&mut self, sink: &mut dyn AudioSink) {
        self.pause(sink);
        self.track = None;
    }

    pub fn music_icon(&self, prefix: &str) -> String {
        let state = if self.music { "On" } else { "Off" };
        format!("{prefix}/sprites/music{state}.png")
    }

    pub fn sound_icon(&self, prefix: &str) -> String {
        let state = if self.sound { "On" } else { "Off" };
        format!("{prefix}/sprites/audio{state}.png")
    }
}
