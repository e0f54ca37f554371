use meltplate::io::grid_from_reader;
use meltplate::plate::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Render a plate-reader export as tab-separated text
///
/// `preamble` lines come first, then the header pair with its first well at
/// `start_col`, then one measurement row per entry of `values`.
fn export_text(
    preamble: &[Vec<String>],
    start_col: usize,
    row_header: &[String],
    col_header: &[String],
    values: &[Vec<f64>],
) -> String {
    let mut lines: Vec<String> = preamble.iter().map(|line| line.join("\t")).collect();
    let pad = |label: &str| {
        let mut cells = vec![String::new(); start_col];
        if start_col > 0 {
            cells[0] = label.to_string();
        }
        cells
    };

    let mut row_line = pad("Row");
    row_line.extend(row_header.iter().cloned());
    lines.push(row_line.join("\t"));

    let mut col_line = pad("Column");
    col_line.extend(col_header.iter().cloned());
    lines.push(col_line.join("\t"));

    for (t, measurement) in values.iter().enumerate() {
        let mut line = pad(&format!("Temp {}", t + 1));
        line.extend(measurement.iter().map(|v| v.to_string()));
        lines.push(line.join("\t"));
    }
    lines.join("\n")
}

fn one_based_headers() -> (Vec<String>, Vec<String>) {
    all_wells()
        .map(|w| (w.row().to_string(), w.col().to_string()))
        .unzip()
}

fn random_values(rng: &mut StdRng, n_points: usize) -> Vec<Vec<f64>> {
    (0..n_points)
        .map(|_| (0..N_WELLS).map(|_| rng.random::<f64>() * 1000.0).collect())
        .collect()
}

#[test]
fn recovers_header_despite_noise() {
    let mut rng = StdRng::seed_from_u64(42);
    let start_col = 7;
    let noise: Vec<String> = (0..start_col + N_WELLS + 2)
        .map(|_| rng.random_range(0..100).to_string())
        .collect();
    let (rows, cols) = one_based_headers();
    let values = random_values(&mut rng, 6);
    let text = export_text(&[noise], start_col, &rows, &cols, &values);

    let grid = grid_from_reader(text.as_bytes(), b'\t').unwrap();
    let (matrix, debug) =
        load_plate(&grid, &LayoutOptions::default(), TemperatureRange::default()).unwrap();

    assert_eq!(
        debug,
        LayoutDebug {
            header_row: 1,
            column_row: 2,
            start_col: 7,
            end_col: 7 + N_WELLS,
            score: 384,
        }
    );
    assert_eq!(matrix.n_points(), 6);
    assert_eq!(matrix.wells().len(), N_WELLS);
    for (i, well) in all_wells().enumerate() {
        for (t, row) in values.iter().enumerate() {
            assert_eq!(matrix.value(t, well), Some(row[i]));
        }
    }
}

#[test]
fn temperatures_span_configured_range() {
    let mut rng = StdRng::seed_from_u64(7);
    let (rows, cols) = one_based_headers();
    let text = export_text(&[], 2, &rows, &cols, &random_values(&mut rng, 5));
    let grid = grid_from_reader(text.as_bytes(), b'\t').unwrap();

    let (matrix, _) =
        load_plate(&grid, &LayoutOptions::default(), TemperatureRange::new(40.0, 60.0)).unwrap();
    assert_eq!(matrix.temperatures(), &[40.0, 45.0, 50.0, 55.0, 60.0]);
}

#[test]
fn zero_based_columns_are_shifted() {
    let mut rng = StdRng::seed_from_u64(3);
    let (rows, cols): (Vec<String>, Vec<String>) = all_wells()
        .map(|w| (w.row().to_string(), (w.col() - 1).to_string()))
        .unzip();
    let values = random_values(&mut rng, 3);
    let text = export_text(&[], 0, &rows, &cols, &values);
    let grid = grid_from_reader(text.as_bytes(), b'\t').unwrap();

    let (matrix, debug) =
        load_plate(&grid, &LayoutOptions::default(), TemperatureRange::default()).unwrap();
    assert_eq!(debug.score, 384);
    let p24 = WellId::parse("P24").unwrap();
    assert_eq!(matrix.value(2, p24), Some(values[2][N_WELLS - 1]));
}

fn spoiled_grid(n_invalid: usize) -> Grid {
    let mut rng = StdRng::seed_from_u64(11);
    let (mut rows, cols) = one_based_headers();
    for label in rows.iter_mut().take(n_invalid) {
        *label = "NA".to_string();
    }
    let text = export_text(&[], 0, &rows, &cols, &random_values(&mut rng, 3));
    grid_from_reader(text.as_bytes(), b'\t').unwrap()
}

#[test]
fn rejects_window_below_threshold() {
    let err = detect_layout(&spoiled_grid(85), &LayoutOptions::default()).unwrap_err();
    assert_eq!(
        err,
        PlateError::LayoutNotDetected {
            best_score: 299,
            threshold: 300
        }
    );
}

#[test]
fn accepts_window_at_threshold() {
    let layout = detect_layout(&spoiled_grid(84), &LayoutOptions::default()).unwrap();
    assert_eq!(layout.debug.score, 300);

    // unlabelled columns leave their wells unmeasured
    let (matrix, _) = load_plate(
        &spoiled_grid(84),
        &LayoutOptions::default(),
        TemperatureRange::default(),
    )
    .unwrap();
    assert_eq!(matrix.wells().len(), N_WELLS);
    assert_eq!(matrix.measured_wells().len(), 300);
    assert_eq!(matrix.value(0, WellId::parse("A1").unwrap()), None);
}

#[test]
fn too_few_measurement_rows() {
    let (rows, cols) = one_based_headers();
    let text = export_text(&[], 0, &rows, &cols, &[vec![1.5; N_WELLS]]);
    let grid = grid_from_reader(text.as_bytes(), b'\t').unwrap();

    let err = load_plate(&grid, &LayoutOptions::default(), TemperatureRange::default())
        .unwrap_err();
    assert_eq!(err, PlateError::InsufficientPoints { found: 1 });
}
