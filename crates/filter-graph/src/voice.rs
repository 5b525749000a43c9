//! Voice changer presets.

use clipsmith_edit_model::VoiceEffect;

/// Sample rate the pitch-shifting presets resample back to.
pub const VOICE_SAMPLE_RATE: u32 = 44_100;

/// Audio chain for a voice effect, `None` for [`VoiceEffect::None`].
pub fn voice_filter(effect: VoiceEffect) -> Option<String> {
    let sr = VOICE_SAMPLE_RATE;
    let chain = match effect {
        VoiceEffect::None => return None,
        // Pitch up then restore duration.
        VoiceEffect::Chipmunk => format!("asetrate={sr}*1.5,aresample={sr},atempo=0.6667"),
        VoiceEffect::Deep => format!("asetrate={sr}*0.75,aresample={sr},atempo=1.3333"),
        VoiceEffect::Robot => {
            "afftfilt=real='hypot(re,im)*sin(0)':imag='hypot(re,im)*cos(0)':win_size=512:overlap=0.75"
                .to_string()
        }
        VoiceEffect::Echo => "aecho=0.8:0.88:60:0.4".to_string(),
        VoiceEffect::Radio => {
            "highpass=f=300,lowpass=f=3400,acompressor=threshold=0.125:ratio=4".to_string()
        }
        VoiceEffect::Telephone => "highpass=f=500,lowpass=f=2500".to_string(),
        VoiceEffect::Reverb => "aecho=0.8:0.9:1000:0.3".to_string(),
    };
    Some(chain)
}
