//! Integration tests for the token contract: round trips, resource and
//! secret binding, expiry, normalization, malformed input, batches, and
//! lifetime clamping.

mod common;

use common::{T0, codec_at_t0};
use folio_token::{
    FailureReason, MAX_LIFETIME_MINUTES, TokenCodec, Verification, batch_generate, generate,
    verify,
};

const RESOURCES: &[&str] = &[
    "a/b.jpg",
    "game/cover.jpg",
    "videos/2024/intro.mp4",
    "gallery/summer trip/IMG_0001.JPG",
    "x",
    "deeply/nested/path/with.many.dots.png",
];

const SECRETS: &[&str] = &["secret123", "s", "a much longer secret with spaces"];

#[test]
fn test_round_trip_is_valid_immediately() {
    for secret in SECRETS {
        for resource in RESOURCES {
            for minutes in [1, 30, 120] {
                let issued = generate(resource, secret, minutes).unwrap();
                let result = verify(&issued.token, resource, secret).unwrap();
                assert!(
                    result.is_valid(),
                    "{resource} / {minutes}m under {secret:?} should verify"
                );
            }
        }
    }
}

#[test]
fn test_tokens_are_resource_bound() {
    for (i, r1) in RESOURCES.iter().enumerate() {
        let issued = generate(r1, "secret123", 30).unwrap();
        for (j, r2) in RESOURCES.iter().enumerate() {
            if i == j {
                continue;
            }
            assert_eq!(
                verify(&issued.token, r2, "secret123").unwrap().reason(),
                Some(FailureReason::BadSignature),
                "token for {r1} must not open {r2}"
            );
        }
    }
}

#[test]
fn test_tokens_are_secret_bound() {
    for s1 in SECRETS {
        let issued = generate("a/b.jpg", s1, 30).unwrap();
        for s2 in SECRETS.iter().filter(|s2| *s2 != s1) {
            assert_eq!(
                verify(&issued.token, "a/b.jpg", s2).unwrap().reason(),
                Some(FailureReason::BadSignature)
            );
        }
    }
}

#[test]
fn test_one_minute_token_expires_after_61_seconds() {
    let (codec, clock) = codec_at_t0("secret123");
    let issued = codec.generate("a/b.jpg", 1).unwrap();
    assert!(codec.verify(&issued.token, "a/b.jpg").is_valid());

    clock.advance(61);
    assert_eq!(
        codec.verify(&issued.token, "a/b.jpg"),
        Verification::Invalid(FailureReason::Expired)
    );
}

#[test]
fn test_leading_slash_normalizes_both_ways() {
    let (codec, _) = codec_at_t0("secret123");
    let plain = codec.generate("a/b.jpg", 10).unwrap();
    let slashed = codec.generate("/a/b.jpg", 10).unwrap();

    for token in [&plain.token, &slashed.token] {
        assert!(codec.verify(token, "a/b.jpg").is_valid());
        assert!(codec.verify(token, "/a/b.jpg").is_valid());
    }
    // Same clock, same identity: identical tokens.
    assert_eq!(plain.token, slashed.token);
}

#[test]
fn test_malformed_token_does_not_panic() {
    let result = verify("not-a-real-token", "a/b.jpg", "secret123").unwrap();
    assert_eq!(result, Verification::Invalid(FailureReason::Malformed));

    let oversized = "9".repeat(10_000);
    for junk in ["", ".", "..", "123.", ".abc", "🦀.🦀", "1.2.3", oversized.as_str()] {
        assert_eq!(
            verify(junk, "a/b.jpg", "secret123").unwrap().reason(),
            Some(FailureReason::Malformed),
            "{junk:?}"
        );
    }
}

#[test]
fn test_batch_preserves_order() {
    let results = batch_generate(&["x.jpg", "y.jpg"], "secret123", 10).unwrap();
    assert_eq!(results.len(), 2);

    let x = results[0].as_ref().unwrap();
    let y = results[1].as_ref().unwrap();

    assert!(verify(&x.token, "x.jpg", "secret123").unwrap().is_valid());
    assert!(!verify(&x.token, "y.jpg", "secret123").unwrap().is_valid());
    assert!(verify(&y.token, "y.jpg", "secret123").unwrap().is_valid());
    assert!(!verify(&y.token, "x.jpg", "secret123").unwrap().is_valid());
}

#[test]
fn test_batch_failure_stays_in_its_slot() {
    let results = batch_generate(&["ok1.jpg", "", "ok2.jpg"], "secret123", 10).unwrap();

    assert!(results[0].is_ok());
    assert_eq!(results[1].as_ref().unwrap_err().code(), "INVALID_INPUT");
    assert_eq!(results[2].as_ref().unwrap().resource.as_str(), "ok2.jpg");
}

#[test]
fn test_lifetime_is_clamped() {
    let (codec, _) = codec_at_t0("secret123");
    let issued = codec.generate("a.jpg", 99_999).unwrap();
    let max_secs = MAX_LIFETIME_MINUTES.unsigned_abs() * 60;
    assert_eq!(issued.expires, T0 + max_secs);
}

#[test]
fn test_example_scenario() {
    let (codec, clock) = codec_at_t0("secret123");
    let issued = codec.generate("game/cover.jpg", 30).unwrap();
    assert_eq!(issued.expires, T0 + 1800);

    clock.set(T0 + 1000);
    let at_1000 = serde_json::to_value(codec.verify(&issued.token, "game/cover.jpg")).unwrap();
    assert_eq!(at_1000["valid"], true);
    assert_eq!(at_1000["remainingSeconds"], 800);

    clock.set(T0 + 2000);
    let at_2000 = serde_json::to_value(codec.verify(&issued.token, "game/cover.jpg")).unwrap();
    assert_eq!(
        at_2000,
        serde_json::json!({ "valid": false, "reason": "EXPIRED" })
    );
}

#[test]
fn test_rotated_secret_rejects_old_tokens() {
    let old = TokenCodec::new("2024-secret").unwrap();
    let new = TokenCodec::new("2025-secret").unwrap();
    let issued = old.generate("a.jpg", 30).unwrap();

    assert_ne!(old.secret_fingerprint(), new.secret_fingerprint());
    assert_eq!(
        new.verify(&issued.token, "a.jpg").reason(),
        Some(FailureReason::BadSignature)
    );
}
