use flux_core::LeftAction;
use web_sys as web;

use crate::constants::*;

/// Short two-partial tone played when the committed left-hand action changes.
///
/// The `AudioContext` is created lazily on the first user gesture; browsers
/// refuse to start audio before one.
#[derive(Default)]
pub struct Chime {
    ctx: Option<web::AudioContext>,
    last_play: Option<f64>,
}

fn create_gain(audio_ctx: &web::AudioContext, value: f32) -> Option<web::GainNode> {
    match web::GainNode::new(audio_ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Some(g)
        }
        Err(e) => {
            log::error!("GainNode error: {:?}", e);
            None
        }
    }
}

fn pitch_for(action: &LeftAction) -> Option<f32> {
    match action {
        LeftAction::None => None,
        LeftAction::Burst => Some(CHIME_BURST_HZ),
        LeftAction::Sphere => Some(CHIME_SPHERE_HZ),
        LeftAction::Text(_) => Some(CHIME_TEXT_HZ),
    }
}

impl Chime {
    /// Create (or resume) the audio context. Call from a user gesture handler.
    pub fn unlock(&mut self) {
        if self.ctx.is_none() {
            match web::AudioContext::new() {
                Ok(ctx) => {
                    log::info!("audio context started");
                    self.ctx = Some(ctx);
                }
                Err(e) => {
                    log::error!("AudioContext error: {:?}", e);
                    return;
                }
            }
        }
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    /// Play the tone for `action` unless it is `None` or the cooldown is running.
    pub fn play(&mut self, action: &LeftAction) {
        let Some(freq) = pitch_for(action) else {
            return;
        };
        let Some(ctx) = &self.ctx else {
            return;
        };
        let now = ctx.current_time();
        if let Some(last) = self.last_play {
            if now - last < CHIME_COOLDOWN_SEC {
                return;
            }
        }
        self.last_play = Some(now);

        let Some(env) = create_gain(ctx, 0.0) else {
            return;
        };
        let t0 = now + 0.005;
        let _ = env.gain().linear_ramp_to_value_at_time(CHIME_LEVEL, t0 + CHIME_ATTACK_SEC);
        let _ = env.gain().linear_ramp_to_value_at_time(0.0, t0 + CHIME_DURATION_SEC);
        let _ = env.connect_with_audio_node(&ctx.destination());

        for (ratio, wave) in [
            (1.0, web::OscillatorType::Sine),
            (CHIME_PARTIAL_RATIO, web::OscillatorType::Triangle),
        ] {
            let src = match web::OscillatorNode::new(ctx) {
                Ok(s) => s,
                Err(e) => {
                    log::error!("OscillatorNode error: {:?}", e);
                    continue;
                }
            };
            src.set_type(wave);
            src.frequency().set_value(freq * ratio);
            let _ = src.connect_with_audio_node(&env);
            let _ = src.start_with_when(t0);
            let _ = src.stop_with_when(t0 + CHIME_DURATION_SEC + 0.05);
        }
    }
}
