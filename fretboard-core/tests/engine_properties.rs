// Whole-engine properties checked across every root, label and catalog entry.

use std::cell::Cell;

use fretboard_core::{
    FretPosition, IntervalCatalog, Mode, PitchClass, Session, TapOutcome, TheoryEngine,
    fret_positions, pitch::NOTE_NAMES,
};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand_pcg::Pcg32;

#[test]
fn interval_then_function_round_trips() {
    let engine = TheoryEngine::default();
    let labels: Vec<String> = engine.intervals().labels().map(str::to_string).collect();
    assert_eq!(labels.len(), 12);

    for root in NOTE_NAMES {
        for label in &labels {
            let note = engine.notes_for_interval(root, label).unwrap();
            assert_eq!(engine.function_label(note.name(), root).unwrap(), label.as_str());
        }
        assert_eq!(engine.notes_for_interval(root, "1").unwrap().name(), root);
    }
}

#[test]
fn function_label_is_total() {
    let intervals = IntervalCatalog::default();
    for root in PitchClass::all() {
        for note in PitchClass::all() {
            let label = intervals.function_of(note, root);
            assert_eq!(intervals.offset_of(label), Ok(note.interval_from(root)));
        }
    }
}

#[test]
fn every_type_yields_one_note_per_offset() {
    let engine = TheoryEngine::default();
    for entry in engine.catalog().types() {
        for root in PitchClass::all() {
            let notes = engine
                .notes_for_kind(root, &entry.name, entry.kind)
                .unwrap();
            assert_eq!(notes.len(), entry.offsets.len(), "{} on {}", entry.name, root);
            assert_eq!(notes[0], root);
        }
    }
}

#[test]
fn position_count_matches_brute_force() {
    let engine = TheoryEngine::default();
    let board = engine.fretboard();

    for entry in engine.catalog().types() {
        let notes = entry.notes(PitchClass::new(5));
        let positions = engine.fret_positions(&notes);
        let expected = board
            .cells()
            .filter(|&cell| board.note_at(cell).is_some_and(|n| notes.contains(&n)))
            .count();
        assert_eq!(positions.len(), expected, "{}", entry.name);
    }
}

#[test]
fn full_chromatic_target_returns_every_cell() {
    let all: Vec<PitchClass> = PitchClass::all().collect();
    let tuning = TheoryEngine::default().fretboard().tuning().clone();
    let positions = fret_positions(&all, &tuning, 12);
    assert_eq!(positions.len(), tuning.string_count() * 13);
    assert_eq!(positions.first(), Some(&FretPosition::new(0, 0)));
    assert_eq!(positions.last(), Some(&FretPosition::new(5, 12)));
}

#[test]
fn c_major_example_cells() {
    let engine = TheoryEngine::default();
    let notes = engine.notes_for_chord_or_scale("C", "Major").unwrap();
    let names: Vec<&str> = notes.iter().map(|n| n.name()).collect();
    assert_eq!(names, vec!["C", "E", "G"]);

    let positions = engine.fret_positions(&notes);
    assert!(positions.contains(&FretPosition::new(0, 8)));
    assert!(positions.contains(&FretPosition::new(0, 0)));
    assert_eq!(engine.function_label("G", "C").unwrap(), "5");
}

#[test]
fn completion_fires_once_across_revisits() {
    let engine = TheoryEngine::default();
    let fired = Cell::new(0u32);
    let mut session = Session::new(&engine, Pcg32::seed_from_u64(11)).unwrap();
    session.set_on_complete(|_| fired.set(fired.get() + 1));
    session.set_root("A").unwrap();
    session.set_chord_type("Minor").unwrap();
    session.set_mode(Mode::FillChord).unwrap();

    let targets = session.round().targets().to_vec();
    let mut completions = 0;
    // Tap each target twice in a row, then everything again.
    for &cell in targets.iter().chain(targets.iter()) {
        for _ in 0..2 {
            if session.tap(cell) == TapOutcome::Completed {
                completions += 1;
            }
        }
    }
    assert_eq!(completions, 1);
    assert_eq!(fired.get(), 1);
    assert_eq!(session.found().len(), targets.len());

    // A new round can complete again.
    session.set_root("E").unwrap();
    let targets = session.round().targets().to_vec();
    for &cell in &targets {
        session.tap(cell);
    }
    assert_eq!(fired.get(), 2);
}

#[test]
fn found_stays_within_targets() {
    let engine = TheoryEngine::default();
    let mut session = Session::new(&engine, Pcg32::seed_from_u64(5)).unwrap();
    session.set_mode(Mode::FindScale).unwrap();
    session.set_scale_type("MinorHarmonic").unwrap();

    for cell in engine.fretboard().cells() {
        session.tap(cell);
    }
    let targets = session.round().targets();
    assert!(session.found().iter().all(|p| targets.contains(p)));
    assert!(session.is_complete());
}
