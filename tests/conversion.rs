//! Casts, reinterpretation and reshaping across species.

use lanewise::{AnyVector, ElementKind, LanewiseError, Shape, Species, Vector, VectorSpecies};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_bytes(rng: &mut StdRng, species: &'static Species) -> AnyVector {
    let bytes: Vec<u8> = (0..species.vector_byte_size()).map(|_| rng.random()).collect();
    AnyVector::from_ne_bytes(species, &bytes)
}

#[test]
fn test_reinterpret_round_trip() {
    let mut rng = StdRng::seed_from_u64(17);
    for kind in ElementKind::ALL {
        for shape in Shape::ALL {
            let source = Species::of(kind, shape);
            let v = random_bytes(&mut rng, source);
            for other_kind in ElementKind::ALL {
                for other_shape in Shape::ALL {
                    let other = Species::of(other_kind, other_shape);
                    if other.vector_bit_size() < source.vector_bit_size() {
                        continue;
                    }
                    let there = v.reinterpret_shape(other, 0).unwrap();
                    let back = there.reinterpret_shape(source, 0).unwrap();
                    // Compare bits: NaN payloads never compare equal as floats.
                    assert_eq!(back.to_ne_bytes(), v.to_ne_bytes(), "{source} via {other}");
                }
            }
        }
    }
}

#[test]
fn test_reinterpret_truncates_and_pads() {
    let ints = VectorSpecies::<i32>::of(Shape::S256);
    let v = Vector::from_slice(ints, &[1, 2, 3, 4, 5, 6, 7, 8], 0).unwrap();
    let longs = v.reinterpret(VectorSpecies::<i64>::of(Shape::S128));
    assert_eq!(longs.length(), 2);
    let back = longs.reinterpret(ints);
    assert_eq!(back.to_vec(), vec![1, 2, 3, 4, 0, 0, 0, 0]);
}

#[test]
fn test_reshape_is_byte_round_trip() {
    let small = VectorSpecies::<f64>::of(Shape::S128);
    let v = Vector::from_slice(small, &[1.5, -2.5], 0).unwrap();
    let big = v.reshape(VectorSpecies::of(Shape::S512));
    assert_eq!(big.to_vec(), vec![1.5, -2.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    assert_eq!(big.reshape(small), v);
}

#[test]
fn test_cast_rejects_lane_count_mismatch() {
    let v = VectorSpecies::<i16>::of(Shape::S128).iota();
    assert!(matches!(
        v.cast(VectorSpecies::<i32>::of(Shape::S128)),
        Err(LanewiseError::IllegalArgument { .. })
    ));
    assert!(matches!(
        v.cast(VectorSpecies::<f32>::of(Shape::S512)),
        Err(LanewiseError::IllegalArgument { .. })
    ));
    let widened = v.cast(VectorSpecies::<i32>::of(Shape::S256)).unwrap();
    assert_eq!(widened.to_vec(), (0..8).collect::<Vec<_>>());
}

#[test]
fn test_convert_shape_keeps_leading_lanes() {
    let v = VectorSpecies::<i16>::of(Shape::S128).iota();
    let truncated = v.convert_shape(VectorSpecies::<i32>::of(Shape::S128), 0).unwrap();
    assert_eq!(truncated.to_vec(), vec![0, 1, 2, 3]);
    let padded = v.convert_shape(VectorSpecies::<f32>::of(Shape::S512), 0).unwrap();
    assert_eq!(padded.length(), 16);
    assert_eq!(&padded.to_vec()[6..10], &[6.0, 7.0, 0.0, 0.0]);
}

#[test]
fn test_narrowing_casts() {
    let longs = VectorSpecies::<i64>::of(Shape::S128);
    let v = Vector::from_slice(longs, &[0x1_0000_0102, -129], 0).unwrap();
    let bytes = v.convert_shape(VectorSpecies::<i8>::of(Shape::S64), 0).unwrap();
    assert_eq!(&bytes.to_vec()[..3], &[2, 127, 0]);
    // No byte species has two lanes.
    assert!(matches!(v.cast_lanes::<i8>(), Err(LanewiseError::IllegalArgument { .. })));

    let doubles = VectorSpecies::<f64>::of(Shape::S128);
    let d = Vector::from_slice(doubles, &[-1.0e10, 70_000.7], 0).unwrap();
    let shorts = d.convert_shape(VectorSpecies::<i16>::of(Shape::S64), 0).unwrap();
    // Through int: -1e10 saturates to i32::MIN, whose low 16 bits are zero.
    assert_eq!(&shorts.to_vec()[..2], &[0, 70_000i32 as i16]);
}

#[test]
fn test_convert_shape_zero_fills_extra_lanes() {
    let ints = VectorSpecies::<i32>::of(Shape::S64);
    let v = Vector::from_slice(ints, &[7, -7], 0).unwrap();
    let floats = v.convert_shape(VectorSpecies::<f32>::of(Shape::S256), 0).unwrap();
    assert_eq!(floats.to_vec(), vec![7.0, -7.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let placed = v.convert_shape(VectorSpecies::<f32>::of(Shape::S256), -3).unwrap();
    assert_eq!(placed.to_vec(), vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 7.0, -7.0]);
    assert!(matches!(
        v.convert_shape(VectorSpecies::<f32>::of(Shape::S256), -4),
        Err(LanewiseError::IndexOutOfBounds { .. })
    ));
}

#[test]
fn test_dynamic_dispatch_covers_every_kind() {
    let v: AnyVector = VectorSpecies::<i8>::of(Shape::S512).iota().into();
    for kind in ElementKind::ALL {
        let target = Species::of(kind, Shape::S512);
        let converted = v.convert_shape(target, 0).unwrap();
        assert_eq!(converted.kind(), kind);
        assert_eq!(converted.length(), target.length());
        let reinterpreted = v.reinterpret_shape(target, 0).unwrap();
        assert_eq!(reinterpreted.to_ne_bytes(), v.to_ne_bytes());
    }
}

#[test]
fn test_unknown_kind_names_are_rejected() {
    assert_eq!("float".parse::<ElementKind>().unwrap(), ElementKind::Float);
    assert!(matches!(
        "char".parse::<ElementKind>(),
        Err(LanewiseError::UnsupportedElementKind { .. })
    ));
}
