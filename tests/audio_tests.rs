//! Audio codec integration tests across the three sub-formats.

mod common;

use common::builders::{dat_midi, note_on, samp_bytes, tempo_event};
use common::{be_u16, le_u32, ScriptedVorbis};
use datgrab::io::audio::{AudioAsset, AudioFormat, AudioKind, MidiData};
use datgrab::{GrabError, ObjectType};

// ===========================================================================
// PCM
// ===========================================================================

#[test]
fn test_samp_parse_serialize_identity() {
    let payload: Vec<u8> = (0..4000u32).map(|i| (i * 7) as u8).collect();
    let samp = samp_bytes(-16, 22050, &payload);

    let asset = AudioAsset::parse(&samp, AudioKind::Pcm).unwrap();
    assert_eq!(asset.channels, 2);
    assert_eq!(asset.bits_per_sample, 16);
    // 4000 bytes / (22050 * 4) bytes/s = 45.35 ms
    assert_eq!(asset.duration_ms, 45);
    assert_eq!(asset.serialize().unwrap(), samp);
}

#[test]
fn test_samp_roundtrip_sample_asset() {
    let asset = AudioAsset::sample_pcm();
    let parsed = AudioAsset::parse(&asset.serialize().unwrap(), AudioKind::Pcm).unwrap();
    assert_eq!(parsed, asset);
}

#[test]
fn test_samp_trailing_bytes_ignored() {
    let mut samp = samp_bytes(8, 8000, &[1, 2, 3]);
    samp.extend_from_slice(&[0xEE; 5]);
    let asset = AudioAsset::parse(&samp, AudioKind::Pcm).unwrap();
    assert_eq!(asset.data, vec![1, 2, 3]);
}

#[test]
fn test_wav_export_header_scenario() {
    let asset = AudioAsset::sample_pcm();
    let wav = asset.wav_data(0).unwrap();
    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[8..12], b"WAVE");
    assert_eq!(le_u32(&wav, 40) as usize, asset.data.len());
    assert_eq!(le_u32(&wav, 4) as usize, 36 + asset.data.len());
}

#[test]
fn test_wav_export_reimports() {
    let asset = AudioAsset::sample_pcm();
    let wav = asset.wav_data(0).unwrap();
    let imported = AudioAsset::from_wav(&wav).unwrap();
    assert_eq!(imported, asset);
}

#[test]
fn test_wav_offset_rounds_up_to_frame() {
    // Stereo 16-bit at 1500 Hz: 1 ms = 6 bytes, rounded up to 8
    let samp = samp_bytes(-16, 1500, &[0u8; 64]);
    let asset = AudioAsset::parse(&samp, AudioKind::Pcm).unwrap();
    let wav = asset.wav_data(1).unwrap();
    assert_eq!(wav.len(), 44 + 64 - 8);
}

#[test]
fn test_wav_offset_at_end_fails() {
    let asset = AudioAsset::sample_pcm();
    let err = asset.wav_data(1000).unwrap_err();
    assert!(matches!(err, GrabError::OutOfRange { length: 8820, .. }));
}

#[test]
fn test_from_wav_rejects_non_wav() {
    assert!(matches!(
        AudioAsset::from_wav(&[0u8; 10]),
        Err(GrabError::TooShort { .. })
    ));
    assert!(matches!(
        AudioAsset::from_wav(&[0u8; 64]),
        Err(GrabError::BadSignature(_))
    ));
}

// ===========================================================================
// Ogg
// ===========================================================================

#[test]
fn test_ogg_parse_uses_decoder_info() {
    let decoder = ScriptedVorbis::stereo(48_000, 4800);
    let asset = AudioAsset::parse_with_decoder(b"OggS-stream", AudioKind::Ogg, &decoder).unwrap();

    assert_eq!(asset.kind(), AudioKind::Ogg);
    assert_eq!(asset.sample_rate, 48_000);
    assert_eq!(asset.channels, 2);
    assert_eq!(asset.bits_per_sample, 16);
    assert_eq!(asset.duration_ms, 100);
    assert_eq!(asset.pcm_data_size, 4800 * 4);
    assert_eq!(asset.serialize().unwrap(), b"OggS-stream".to_vec());
}

#[test]
fn test_ogg_decoder_failure_propagates() {
    let decoder = ScriptedVorbis::stereo(44_100, 10);
    let err = AudioAsset::parse_with_decoder(b"RIFF", AudioKind::Ogg, &decoder).unwrap_err();
    assert!(matches!(err, GrabError::DecoderFailure(_)));
}

#[test]
fn test_ogg_wav_export_decodes() {
    let decoder = ScriptedVorbis::stereo(8000, 800);
    let asset = AudioAsset::parse_with_decoder(b"OggS", AudioKind::Ogg, &decoder).unwrap();

    // 10 ms at 8 kHz stereo 16-bit = 320 bytes
    let wav = asset.wav_data_with_decoder(10, &decoder).unwrap();
    assert_eq!(wav.len(), 44 + 3200 - 320);
    assert_eq!(&wav[44..], &decoder.pcm[320..]);

    // Without a decoder the export cannot proceed
    assert!(matches!(asset.wav_data(0), Err(GrabError::DecoderFailure(_))));
}

// ===========================================================================
// MIDI
// ===========================================================================

#[test]
fn test_midi_duration_default_tempo() {
    let dat = dat_midi(96, &[(0, &note_on(0x60, 60))]);
    let asset = AudioAsset::parse(&dat, AudioKind::Midi).unwrap();
    assert_eq!(asset.duration_ms, 500);
}

#[test]
fn test_midi_duration_spans_longest_track() {
    let short = note_on(0x30, 60);
    let mut long = note_on(0x60, 60);
    long.extend(note_on(0x60, 62));
    let dat = dat_midi(96, &[(2, &short), (17, &long)]);

    let asset = AudioAsset::parse(&dat, AudioKind::Midi).unwrap();
    assert_eq!(asset.duration_ms, 1000);
}

#[test]
fn test_midi_tempo_from_conductor_track() {
    // Conductor track sets 1 s per quarter at tick 96 and 0.25 s at tick 192
    let mut conductor = tempo_event(0x60, 1_000_000);
    conductor.extend(tempo_event(0x60, 250_000));
    let mut notes = note_on(0x7F, 60);
    notes.extend(note_on(0x7F, 60));
    notes.extend(note_on(0x42, 60)); // ends at tick 320
    let dat = dat_midi(96, &[(0, &conductor), (1, &notes)]);

    let asset = AudioAsset::parse(&dat, AudioKind::Midi).unwrap();
    // [0, 96) at 500000, [96, 192) at 500000, [192, 320) at 1000000
    // = 500 + 500 + 128 * 1000 / 96
    assert_eq!(asset.duration_ms, 2333);
}

#[test]
fn test_midi_smf_export_scenario() {
    let dat = dat_midi(96, &[(7, &note_on(0x60, 60))]);
    let asset = AudioAsset::parse(&dat, AudioKind::Midi).unwrap();

    let smf = asset.midi_data().unwrap();
    assert_eq!(smf.len(), 14 + 8 + 4 + 4);
    assert_eq!(&smf[0..4], b"MThd");
    assert_eq!(be_u16(&smf, 10), 1);
    assert_eq!(&smf[smf.len() - 4..], &[0x00, 0xFF, 0x2F, 0x00]);
}

#[test]
fn test_midi_smf_import_roundtrip() {
    let mut track = note_on(0x60, 60);
    track.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
    let dat = dat_midi(480, &[(0, &track), (1, &track)]);
    let asset = AudioAsset::parse(&dat, AudioKind::Midi).unwrap();

    let smf = asset.midi_data().unwrap();
    let imported = AudioAsset::from_smf(&smf).unwrap();
    assert_eq!(imported, asset);
    assert_eq!(imported.serialize().unwrap(), dat);
}

#[test]
fn test_midi_dat_roundtrip_keeps_slot_positions() {
    let dat = dat_midi(120, &[(3, &[1, 2, 3]), (31, &[9])]);
    let asset = AudioAsset::parse(&dat, AudioKind::Midi).unwrap();
    assert_eq!(asset.serialize().unwrap(), dat);

    match &asset.format {
        AudioFormat::Midi(midi) => {
            assert_eq!(midi.tracks[3], vec![1, 2, 3]);
            assert_eq!(midi.tracks[31], vec![9]);
            assert_eq!(midi.track_count(), 2);
        }
        other => panic!("expected MIDI, got {:?}", other),
    }
}

#[test]
fn test_midi_truncated_dat_fails() {
    let dat = dat_midi(96, &[(0, &note_on(0, 60))]);
    assert!(AudioAsset::parse(&dat[..dat.len() - 1], AudioKind::Midi).is_err());
    assert!(AudioAsset::parse(&dat[..1], AudioKind::Midi).is_err());
}

#[test]
fn test_midi_smpte_duration_zero() {
    let dat = dat_midi(0xE250, &[(0, &note_on(0x60, 60))]);
    let asset = AudioAsset::parse(&dat, AudioKind::Midi).unwrap();
    assert_eq!(asset.duration_ms, 0);
}

#[test]
fn test_midi_without_tracks_exports_nothing() {
    let asset = AudioAsset::sample_midi();
    assert!(asset.midi_data().unwrap().is_empty());
    assert!(matches!(
        asset.wav_data(0),
        Err(GrabError::UnsupportedSubformat(_))
    ));
}

#[test]
fn test_invalid_midi_exports_nothing() {
    let mut midi = MidiData::new(0);
    midi.tracks[0] = note_on(0, 60);
    let asset = AudioAsset::from_midi(midi);
    assert!(!asset.is_valid_format());
    assert!(asset.midi_data().unwrap().is_empty());
    assert!(asset.serialize().unwrap().is_empty());
}

// ===========================================================================
// Object types and captions
// ===========================================================================

#[test]
fn test_object_type_dispatch() {
    let samp = AudioAsset::sample_pcm().serialize().unwrap();
    let tag = u32::from_be_bytes(*b"SAMP");

    let kind = ObjectType::from_id(tag)
        .and_then(ObjectType::audio_kind)
        .unwrap();
    let asset = AudioAsset::parse(&samp, kind).unwrap();
    assert_eq!(asset.object_type().id(), tag);
}

#[test]
fn test_captions() {
    let mut ogg = AudioAsset::sample_ogg();
    ogg.duration_ms = 61_500;
    assert_eq!(
        ogg.caption(),
        "OGG Vorbis: 44100 Hz, 2 ch, 16 bit, duration: 1:01 min"
    );

    let dat = dat_midi(96, &[(0, &note_on(0x60, 60)), (4, &note_on(0, 62))]);
    let midi = AudioAsset::parse(&dat, AudioKind::Midi).unwrap();
    assert_eq!(midi.caption(), "MIDI: 96 divisions, 2 tracks");
}

#[test]
fn test_wav_import_beyond_samp_range_does_not_serialize() {
    let wav = datgrab::io::audio::wav::build_wav(1, 96_000, 16, &[0u8; 192]).unwrap();
    let asset = AudioAsset::from_wav(&wav).unwrap();
    assert!(asset.is_valid_format());
    assert_eq!(asset.sample_rate, 96_000);
    assert!(matches!(
        asset.serialize(),
        Err(GrabError::UnsupportedSubformat(_))
    ));

    // Still exportable as WAV
    assert_eq!(asset.wav_data(0).unwrap(), wav);
}

#[test]
fn test_wav_offset_overflow_is_out_of_range() {
    let mut asset = AudioAsset::sample_pcm();
    asset.sample_rate = u32::MAX;
    asset.channels = u16::MAX as u32;
    assert!(matches!(
        asset.wav_data(u32::MAX),
        Err(GrabError::OutOfRange { length: 8820, .. })
    ));
}
