//! Encode command assembly.
//!
//! Turns an edit plus the names of the staged inputs into one ffmpeg
//! argument list. Three shapes are produced:
//! - **Passthrough:** nothing to change, stream copy with the trim applied
//! - **Simple:** one input, `-vf` and `-af` chains
//! - **Graph:** overlay and/or music inputs, one `-filter_complex` with
//!   explicit `-map`s

use clipsmith_edit_model::EditDescription;
use clipsmith_filter_graph::{audio_filters, fmt_num, video_filters, FilterChain};

/// Output codec settings shared by every re-encode.
pub const CODEC_ARGS: &[&str] = &[
    "-c:v",
    "libx264",
    "-preset",
    "veryfast",
    "-crf",
    "23",
    "-pix_fmt",
    "yuv420p",
    "-c:a",
    "aac",
    "-b:a",
    "128k",
    "-movflags",
    "+faststart",
];

/// Frame rate of normalized segments.
pub const SEGMENT_FPS: u32 = 30;
/// Audio sample rate of normalized segments.
pub const SEGMENT_SAMPLE_RATE: u32 = 44_100;

/// Which command shape was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandPath {
    Passthrough,
    Simple,
    Graph,
}

impl CommandPath {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandPath::Passthrough => "passthrough",
            CommandPath::Simple => "simple",
            CommandPath::Graph => "graph",
        }
    }
}

/// A complete argument list and the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledCommand {
    pub args: Vec<String>,
    pub path: CommandPath,
}

/// Working-file names of the staged inputs and the output.
#[derive(Debug, Clone, Copy)]
pub struct StagedInputs<'a> {
    pub video: &'a str,
    pub overlay: Option<&'a str>,
    pub music: Option<&'a str>,
    pub output: &'a str,
}

/// Build the encode command for one edit.
pub fn assemble(edit: &EditDescription, inputs: &StagedInputs<'_>) -> AssembledCommand {
    let video = video_filters(edit);
    let mut audio = audio_filters(edit);
    let volume = edit.original_volume();

    let mut args = range_args(edit);
    push(&mut args, ["-i", inputs.video]);

    if inputs.overlay.is_none() && inputs.music.is_none() {
        if (volume - 1.0).abs() > 1e-6 {
            audio.push(format!("volume={}", fmt_num(volume)));
        }

        if video.is_empty() && audio.is_empty() {
            push(&mut args, ["-c", "copy", "-movflags", "+faststart", inputs.output]);
            return AssembledCommand {
                args,
                path: CommandPath::Passthrough,
            };
        }

        if let Some(vf) = video.build() {
            push(&mut args, ["-vf", vf.as_str()]);
        }
        if let Some(af) = audio.build() {
            push(&mut args, ["-af", af.as_str()]);
        }
        push(&mut args, CODEC_ARGS.iter().copied());
        args.push(inputs.output.to_string());
        return AssembledCommand {
            args,
            path: CommandPath::Simple,
        };
    }

    let mut next_input = 1;
    let overlay_index = inputs.overlay.map(|name| {
        push(&mut args, ["-i", name]);
        let index = next_input;
        next_input += 1;
        index
    });
    let music_index = inputs.music.map(|name| {
        push(&mut args, ["-i", name]);
        next_input
    });

    let mut graph = Vec::new();
    let base = video.build().unwrap_or_else(|| "null".to_string());
    match overlay_index {
        Some(index) => {
            graph.push(format!("[0:v]{base}[vbase]"));
            graph.push(format!("[vbase][{index}:v]overlay=0:0[vout]"));
        }
        None => graph.push(format!("[0:v]{base}[vout]")),
    }

    let audio_label = match music_index {
        Some(index) => {
            let music_gain = fmt_num(edit.music_gain());
            if volume > 0.0 {
                audio.push(format!("volume={}", fmt_num(volume)));
                graph.push(format!("[0:a]{}[a_orig]", audio.build_or("anull")));
                graph.push(format!("[{index}:a]volume={music_gain}[a_music]"));
                graph.push(
                    "[a_orig][a_music]amix=inputs=2:duration=first:dropout_transition=0[aout]"
                        .to_string(),
                );
            } else {
                graph.push(format!("[{index}:a]volume={music_gain}[aout]"));
            }
            Some("[aout]")
        }
        None => {
            if (volume - 1.0).abs() > 1e-6 {
                audio.push(format!("volume={}", fmt_num(volume)));
            }
            audio.build().map(|chain| {
                graph.push(format!("[0:a]{chain}[aout]"));
                "[aout]"
            })
        }
    };

    let graph = graph.join(";");
    push(&mut args, ["-filter_complex", graph.as_str(), "-map", "[vout]"]);
    match audio_label {
        Some(label) => push(&mut args, ["-map", label]),
        // Untouched source audio, if the clip has any.
        None => push(&mut args, ["-map", "0:a?"]),
    }
    if music_index.is_some() {
        args.push("-shortest".to_string());
    }
    push(&mut args, CODEC_ARGS.iter().copied());
    args.push(inputs.output.to_string());

    AssembledCommand {
        args,
        path: CommandPath::Graph,
    }
}

/// Input options selecting the trimmed range of input 0.
pub fn range_args(edit: &EditDescription) -> Vec<String> {
    let mut args = Vec::new();
    let start = edit.start_secs();
    if start > 0.0 {
        args.push("-ss".to_string());
        args.push(format!("{start:.3}"));
    }
    if let Some(duration) = edit.trimmed_duration() {
        args.push("-t".to_string());
        args.push(format!("{duration:.3}"));
    }
    args
}

/// Encoder settings for segments that will be joined by stream copy.
pub fn segment_profile_args() -> Vec<String> {
    let mut args = vec![
        "-r".to_string(),
        SEGMENT_FPS.to_string(),
        "-ar".to_string(),
        SEGMENT_SAMPLE_RATE.to_string(),
        "-ac".to_string(),
        "2".to_string(),
    ];
    push(&mut args, CODEC_ARGS.iter().copied());
    args
}

/// Video chain that conforms a stream to the segment profile.
pub fn normalize_video_chain() -> FilterChain {
    let mut chain = FilterChain::new();
    chain.push(format!("fps={SEGMENT_FPS}"));
    chain.push("format=yuv420p");
    chain.push("setsar=1");
    chain
}

/// Audio chain that conforms a stream to the segment profile.
pub fn normalize_audio_chain() -> FilterChain {
    let mut chain = FilterChain::new();
    chain.push(format!(
        "aformat=sample_rates={SEGMENT_SAMPLE_RATE}:channel_layouts=stereo"
    ));
    chain
}

/// Concat-demuxer list for `segments`, in order.
pub fn concat_list(segments: &[String]) -> String {
    segments
        .iter()
        .map(|name| format!("file '{}'\n", name.replace('\'', "'\\''")))
        .collect()
}

/// Join the segments listed in `list` without re-encoding.
pub fn concat_args(list: &str, output: &str) -> Vec<String> {
    [
        "-f",
        "concat",
        "-safe",
        "0",
        "-i",
        list,
        "-c",
        "copy",
        "-movflags",
        "+faststart",
        output,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub(crate) fn push<'s>(args: &mut Vec<String>, items: impl IntoIterator<Item = &'s str>) {
    args.extend(items.into_iter().map(str::to_string));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipsmith_edit_model::{Transform, Tune, VoiceEffect};

    const INPUTS: StagedInputs<'static> = StagedInputs {
        video: "in.mp4",
        overlay: None,
        music: None,
        output: "out.mp4",
    };

    fn joined(cmd: &AssembledCommand) -> String {
        cmd.args.join(" ")
    }

    #[test]
    fn test_trim_only_is_stream_copy() {
        let edit = EditDescription {
            trim_start: Some(2.0),
            trim_end: Some(7.0),
            ..Default::default()
        };
        let cmd = assemble(&edit, &INPUTS);
        assert_eq!(cmd.path, CommandPath::Passthrough);
        assert_eq!(
            joined(&cmd),
            "-ss 2.000 -t 5.000 -i in.mp4 -c copy -movflags +faststart out.mp4"
        );
    }

    #[test]
    fn test_neutral_filters_stay_passthrough() {
        let edit = EditDescription {
            tune: Some(Tune::default()),
            volume: Some(1.0),
            ..Default::default()
        };
        assert_eq!(assemble(&edit, &INPUTS).path, CommandPath::Passthrough);
    }

    #[test]
    fn test_simple_path_uses_vf_and_af() {
        let edit = EditDescription {
            transform: Some(Transform {
                flip_h: true,
                ..Default::default()
            }),
            voice_effect: VoiceEffect::Echo,
            volume: Some(0.5),
            ..Default::default()
        };
        let cmd = assemble(&edit, &INPUTS);
        assert_eq!(cmd.path, CommandPath::Simple);
        let text = joined(&cmd);
        assert!(text.starts_with("-i in.mp4 -vf hflip -af aecho=0.8:0.88:60:0.4,volume=0.5 "));
        assert!(text.contains("-c:v libx264 -preset veryfast -crf 23 -pix_fmt yuv420p"));
        assert!(text.ends_with("-movflags +faststart out.mp4"));
    }

    #[test]
    fn test_overlay_graph() {
        let edit = EditDescription {
            transform: Some(Transform {
                rotation: 180,
                ..Default::default()
            }),
            ..Default::default()
        };
        let inputs = StagedInputs {
            overlay: Some("ov.png"),
            ..INPUTS
        };
        let cmd = assemble(&edit, &inputs);
        assert_eq!(cmd.path, CommandPath::Graph);
        let args = &cmd.args;
        let graph = &args[args.iter().position(|a| a == "-filter_complex").unwrap() + 1];
        assert_eq!(
            graph,
            "[0:v]transpose=1,transpose=1[vbase];[vbase][1:v]overlay=0:0[vout]"
        );
        assert!(joined(&cmd).contains("-map [vout] -map 0:a?"));
        assert!(!args.contains(&"-shortest".to_string()));
    }

    #[test]
    fn test_music_mix_graph() {
        let edit = EditDescription {
            music_url: Some("https://cdn.example.com/m.mp3".to_string()),
            volume: Some(0.8),
            music_volume: Some(0.3),
            ..Default::default()
        };
        let inputs = StagedInputs {
            overlay: Some("ov.png"),
            music: Some("m.mp3"),
            ..INPUTS
        };
        let cmd = assemble(&edit, &inputs);
        let text = joined(&cmd);
        assert!(text.contains("-i in.mp4 -i ov.png -i m.mp3"));
        assert!(text.contains(
            "[0:a]volume=0.8[a_orig];[2:a]volume=0.3[a_music];\
             [a_orig][a_music]amix=inputs=2:duration=first:dropout_transition=0[aout]"
        ));
        assert!(text.contains("-map [vout] -map [aout] -shortest -c:v libx264"));
    }

    #[test]
    fn test_muted_original_uses_music_alone() {
        let edit = EditDescription {
            volume: Some(0.0),
            ..Default::default()
        };
        let inputs = StagedInputs {
            music: Some("m.mp3"),
            ..INPUTS
        };
        let cmd = assemble(&edit, &inputs);
        let text = joined(&cmd);
        assert!(text.contains("[0:v]null[vout];[1:a]volume=0.5[aout]"));
        assert!(!text.contains("[0:a]"));
    }

    #[test]
    fn test_concat_list_quotes_names() {
        let list = concat_list(&["a.mp4".to_string(), "it's.mp4".to_string()]);
        assert_eq!(list, "file 'a.mp4'\nfile 'it'\\''s.mp4'\n");
    }
}
