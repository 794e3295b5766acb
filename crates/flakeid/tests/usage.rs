use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
    thread::scope,
};

use flakeid::{
    Checkpoint, EncodingError, Error, Field, FlakeId, GeneratorConfig, MonotonicClock,
    Resolution, TimeSource,
};

struct FixedTime(u64);

impl TimeSource for FixedTime {
    fn current_millis(&self) -> u64 {
        self.0
    }
}

#[test]
fn reference_identifier_in_every_form() {
    let id = FlakeId::from_parts(3_020_801_146_913, 37, 160).unwrap();

    let integer = id.to_integer();
    let bytes = id.to_bytes();
    let text = id.to_text();
    assert_eq!(integer, 6_335_079_166_850_929_824);
    assert_eq!(bytes, [0x57, 0xEA, 0xB8, 0xF0, 0x04, 0x20, 0x94, 0xA0]);
    assert_eq!(text, "V-q48AQglKA");

    for decoded in [
        FlakeId::from_integer(integer),
        FlakeId::from_bytes(&bytes).unwrap(),
        FlakeId::from_text(&text).unwrap(),
    ] {
        assert_eq!(decoded, id);
        assert_eq!(decoded.timestamp(), 3_020_801_146_913);
        assert_eq!(decoded.sequence(), 37);
        assert_eq!(decoded.generator_id(), 160);
    }
}

#[test]
fn out_of_range_parts_are_rejected() {
    assert_eq!(
        FlakeId::from_parts(0, 2048, 0).unwrap_err(),
        Error::FieldOutOfRange {
            field: Field::Sequence,
            value: 2048,
            max: 2047,
        }
    );
    assert!(matches!(
        FlakeId::from_parts(1 << 42, 0, 0),
        Err(Error::FieldOutOfRange {
            field: Field::Timestamp,
            ..
        })
    ));
    assert!(matches!(
        FlakeId::from_parts(0, 0, 256),
        Err(Error::FieldOutOfRange {
            field: Field::GeneratorId,
            ..
        })
    ));
}

#[test]
fn malformed_encodings_are_rejected() {
    assert_eq!(
        FlakeId::from_bytes(&[0; 7]).unwrap_err(),
        Error::InvalidEncoding(EncodingError::InvalidLength {
            expected: 8,
            actual: 7,
        })
    );
    assert!(FlakeId::from_text("V-q48AQglKA=").is_err());
    assert!(FlakeId::from_text("V-q48AQgl+A").is_err());
}

#[test]
fn generator_resumes_without_reissuing() {
    let clock = Arc::new(FixedTime(1_483_228_800_000 + 500));
    let first = GeneratorConfig::new(12)
        .unwrap()
        .build_with_clock(Arc::clone(&clock))
        .unwrap();
    let a = first.next().unwrap();
    let b = first.next().unwrap();
    assert_eq!((a.timestamp(), a.sequence()), (500, 0));
    assert_eq!((b.timestamp(), b.sequence()), (500, 1));

    let saved = first.checkpoint().unwrap();
    assert_eq!(
        saved,
        Checkpoint {
            timestamp_last: 500,
            sequence: 1,
        }
    );
    drop(first);

    let second = GeneratorConfig::new(12)
        .unwrap()
        .resume_from(saved)
        .build_with_clock(clock)
        .unwrap();
    let c = second.next().unwrap();
    assert!(c > b);
    assert_eq!(c.sequence(), 2);
}

#[test]
fn distinct_generators_never_collide() {
    let clock = MonotonicClock::new();
    let generators: Vec<_> = (0..4u16)
        .map(|gid| {
            GeneratorConfig::new(gid)
                .unwrap()
                .timestamp_in_seconds()
                .build_with_clock(clock.clone())
                .unwrap()
        })
        .collect();
    assert_eq!(generators[0].resolution(), Resolution::Second);

    let seen = Mutex::new(HashSet::new());
    scope(|s| {
        for generator in &generators {
            let seen = &seen;
            s.spawn(move || {
                let ids: Vec<FlakeId> = (0..1_000).map(|_| generator.next().unwrap()).collect();
                assert!(ids.iter().all(|id| id.generator_id() == generator.generator_id()));
                seen.lock().unwrap().extend(ids);
            });
        }
    });
    assert_eq!(seen.into_inner().unwrap().len(), 4_000);
}

#[test]
fn overflow_is_backpressure() {
    let generator = GeneratorConfig::new(1)
        .unwrap()
        .timestamp_offset(0)
        .not_wait_sequence()
        .build_with_clock(FixedTime(7))
        .unwrap();
    for _ in 0..=FlakeId::MAX_SEQUENCE {
        generator.next().unwrap();
    }
    let err = generator.next().unwrap_err();
    assert_eq!(
        err,
        Error::SequenceOverflow {
            timestamp: 7,
            sequence: 2047,
        }
    );
    assert_eq!(
        err.to_string(),
        "sequence overflow at timestamp 7 (last sequence 2047)"
    );
}
