use aspcap_grid::domain::{Chip, ChipConstants, ChipFlux, Direction, GridConstants, PixelRange, PixelSpace};
use aspcap_grid::error::GridError;
use aspcap_grid::grid::{self, GridConverter, GridGeometry};

/// A small grid with the same shape as APOGEE: three chips with gaps.
fn toy_constants() -> GridConstants {
    GridConstants {
        logw0: 3.0,
        dlogw: 1e-3,
        nw_apstar: 20,
        chips: [
            ChipConstants { logw0: 3.002, nw: 5 },
            ChipConstants { logw0: 3.009, nw: 4 },
            ChipConstants { logw0: 3.015, nw: 3 },
        ],
    }
}

#[test]
fn apogee_chip_ranges_in_both_spaces() {
    let apstar = grid::chip_index_ranges(PixelSpace::ApStar).unwrap();
    assert_eq!(
        apstar,
        [
            PixelRange::new(246, 3274),
            PixelRange::new(3585, 6080),
            PixelRange::new(6344, 8335),
        ]
    );
    let chip = grid::chip_index_ranges(PixelSpace::Chip).unwrap();
    assert_eq!(
        chip,
        [
            PixelRange::new(0, 3028),
            PixelRange::new(3028, 5523),
            PixelRange::new(5523, 7514),
        ]
    );
}

#[test]
fn wavelength_grids_have_expected_lengths_and_bounds() {
    let apstar = grid::apstar_wavelengths();
    assert_eq!(apstar.len(), 8575);
    assert!((apstar[0] - 10f64.powf(4.179)).abs() < 1e-9);

    let chips = grid::chip_wavelengths();
    assert_eq!(chips.iter().map(Vec::len).collect::<Vec<_>>(), vec![3028, 2495, 1991]);
    // Chip samples coincide with apStar samples.
    assert!((chips[0][0] - apstar[246]).abs() < 1e-6);
    assert!((chips[2][1990] - apstar[8334]).abs() < 1e-6);
}

#[test]
fn free_functions_round_trip_a_spectrum() {
    let flux = ChipFlux::new(vec![1.0f64; 3028], vec![2.0; 2495], vec![3.0; 1991]);
    let apstar = grid::chip_to_apstar(&flux).unwrap();
    assert_eq!(apstar.len(), 8575);
    assert_eq!(apstar[245], 0.0);
    assert_eq!(apstar[246], 1.0);
    assert_eq!(apstar[3585], 2.0);
    assert_eq!(apstar[8334], 3.0);
    assert_eq!(apstar[8335], 0.0);
    assert_eq!(grid::apstar_to_chip(&apstar).unwrap(), flux);
}

#[test]
fn toy_grid_geometry() {
    let geometry = GridGeometry::new(&toy_constants()).unwrap();
    assert_eq!(
        geometry.chip_ranges(PixelSpace::ApStar),
        [PixelRange::new(2, 7), PixelRange::new(9, 13), PixelRange::new(15, 18)]
    );
    assert_eq!(geometry.len(PixelSpace::Chip), 12);
    assert_eq!(
        geometry.gaps(),
        vec![
            PixelRange::new(0, 2),
            PixelRange::new(7, 9),
            PixelRange::new(13, 15),
            PixelRange::new(18, 20),
        ]
    );

    let converter = GridConverter::new(&geometry);
    let aspcap: Vec<i32> = (1..=12).collect();
    let apstar = converter.convert(Direction::ToApStar, &aspcap).unwrap();
    assert_eq!(
        apstar,
        vec![0, 0, 1, 2, 3, 4, 5, 0, 0, 6, 7, 8, 9, 0, 0, 10, 11, 12, 0, 0]
    );
    assert_eq!(converter.convert(Direction::ToChip, &apstar).unwrap(), aspcap);
    assert_eq!(converter.apstar_to_chip(&apstar).unwrap().chip(Chip::Green), &[6, 7, 8, 9]);
}

#[test]
fn toy_grid_rejects_chip_running_off_the_end() {
    let mut constants = toy_constants();
    constants.chips[2].nw = 5;
    let err = GridGeometry::new(&constants).unwrap_err();
    assert!(matches!(
        err,
        GridError::GridConstantInconsistency { chip: "red", .. }
    ));
}

#[test]
fn shape_errors_name_the_offending_array() {
    let geometry = GridGeometry::new(&toy_constants()).unwrap();
    let converter = GridConverter::new(&geometry);
    let err = converter.convert(Direction::ToChip, &[0.0f64; 19]).unwrap_err();
    assert_eq!(err, GridError::shape("apStar flux", 20, 19));
}
