//! Generate a deterministic synthetic maintenance dataset in the canonical
//! CSV schema, for demos and manual testing.
//!
//! Usage: `cargo run --bin generate_sample [rows] [output.csv]`

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    udi: u32,
    product_id: String,
    machine_type: &'static str,
    air_temperature: f64,
    process_temperature: f64,
    rotational_speed: i64,
    torque: f64,
    tool_wear: i64,
    target: u8,
    failure_type: &'static str,
}

/// Sample one synthetic machine observation. Failure modes follow the rough
/// physical conditions of the AI4I 2020 dataset: overstrain at high
/// torque × wear, heat dissipation at small temperature gap and low speed,
/// power at extreme mechanical power, tool wear near end of life.
fn generate_row(udi: u32, rng: &mut SimpleRng) -> Row {
    let type_roll = rng.next_f64();
    let machine_type = if type_roll < 0.6 {
        "L"
    } else if type_roll < 0.9 {
        "M"
    } else {
        "H"
    };

    let air = rng.gauss(300.0, 2.0).clamp(290.0, 310.0);
    let process = (air + rng.gauss(10.0, 1.0)).clamp(300.0, 320.0);
    let speed = rng.gauss(1540.0, 180.0).clamp(1000.0, 3000.0).round();
    let torque = rng.gauss(40.0, 10.0).clamp(3.5, 77.0);
    let wear = (rng.next_f64() * 250.0).round();

    let power = torque * speed * (2.0 * std::f64::consts::PI / 60.0);

    let (target, failure_type) = if torque * wear > 11_000.0 && rng.next_f64() < 0.7 {
        (1, "Overstrain Failure")
    } else if process - air < 8.6 && speed < 1380.0 {
        (1, "Heat Dissipation Failure")
    } else if !(3500.0..=9000.0).contains(&power) && rng.next_f64() < 0.5 {
        (1, "Power Failure")
    } else if wear >= 220.0 && rng.next_f64() < 0.4 {
        (1, "Tool Wear Failure")
    } else if rng.next_f64() < 0.001 {
        (1, "Random Failures")
    } else {
        (0, "No Failure")
    };

    Row {
        udi,
        product_id: format!("{machine_type}{}", 10000 + udi),
        machine_type,
        air_temperature: air,
        process_temperature: process,
        rotational_speed: speed as i64,
        torque,
        tool_wear: wear as i64,
        target,
        failure_type,
    }
}

fn main() {
    let mut args = std::env::args().skip(1);
    let n_rows: u32 = args
        .next()
        .map(|s| s.parse().expect("rows must be an integer"))
        .unwrap_or(1000);
    let output_path = args
        .next()
        .unwrap_or_else(|| "assets/predictive_maintenance.csv".to_string());

    let mut rng = SimpleRng::new(42);

    let mut writer = csv::Writer::from_path(&output_path).expect("Failed to create output file");
    writer
        .write_record([
            "UDI",
            "Product ID",
            "Type",
            "Air temperature [K]",
            "Process temperature [K]",
            "Rotational speed [rpm]",
            "Torque [Nm]",
            "Tool wear [min]",
            "Target",
            "Failure Type",
        ])
        .expect("Failed to write header");

    let mut failures = 0u32;
    for udi in 1..=n_rows {
        let row = generate_row(udi, &mut rng);
        failures += u32::from(row.target);
        writer
            .write_record([
                row.udi.to_string(),
                row.product_id,
                row.machine_type.to_string(),
                format!("{:.1}", row.air_temperature),
                format!("{:.1}", row.process_temperature),
                row.rotational_speed.to_string(),
                format!("{:.1}", row.torque),
                row.tool_wear.to_string(),
                row.target.to_string(),
                row.failure_type.to_string(),
            ])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush output");

    println!("Wrote {n_rows} observations ({failures} failures) to {output_path}");
}
