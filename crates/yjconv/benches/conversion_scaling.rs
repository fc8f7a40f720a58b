//! Scaling analysis: verify conversion time grows linearly with input size
//!
//! Each generator produces YAML of increasing size. The document is converted
//! to JSON and the JSON back to YAML; if time per item stays roughly constant
//! as size grows, both directions are O(n).
//!
//! Run with: cargo bench --bench conversion_scaling

use std::time::{Duration, Instant};
use yjconv::{DEFAULT_INDENT, json_to_yaml, yaml_to_json};

const ITERATIONS: u32 = 20;

struct ScalingResult {
    size: usize,
    to_json: Duration,
    to_yaml: Duration,
}

/// Generate a flat array of N string items
fn generate_flat_array(n: usize) -> String {
    let mut yaml = String::from("[\n");
    for i in 0..n {
        yaml.push_str(&format!("  \"item_{}\",\n", i));
    }
    yaml.push_str("]\n");
    yaml
}

/// Generate a flat hash with N key-value pairs
fn generate_flat_hash(n: usize) -> String {
    let mut yaml = String::new();
    for i in 0..n {
        yaml.push_str(&format!("key_{}: \"value_{}\"\n", i, i));
    }
    yaml
}

/// Generate N sections that all merge a shared defaults mapping
fn generate_merged_sections(n: usize) -> String {
    let mut yaml = String::from("defaults: &defaults\n  enabled: true\n  retries: 3\n  ratio: 0.5\n");
    for i in 0..n {
        yaml.push_str(&format!(
            "section_{}:\n  <<: *defaults\n  title: \"Section {}\"\n  created: 2001-12-14t21:59:43.10-05:00\n  items:\n    - item1\n    - item2\n",
            i, i
        ));
    }
    yaml
}

/// Generate a nested structure with depth D and breadth B
fn generate_nested_structure(depth: usize, breadth: usize) -> String {
    fn generate_level(current_depth: usize, max_depth: usize, breadth: usize, indent: usize) -> String {
        let ind = "  ".repeat(indent);

        if current_depth >= max_depth {
            return format!("{}value\n", ind);
        }

        let mut yaml = String::new();
        for i in 0..breadth {
            yaml.push_str(&format!("{}child_{}:\n", ind, i));
            yaml.push_str(&generate_level(current_depth + 1, max_depth, breadth, indent + 1));
        }
        yaml
    }

    generate_level(0, depth, breadth, 0)
}

fn time_round_trip(yaml: &str) -> (Duration, Duration) {
    let json = yaml_to_json(yaml.as_bytes()).expect("Failed to convert YAML to JSON");
    json_to_yaml(&json, DEFAULT_INDENT).expect("Failed to convert JSON to YAML");

    let start = Instant::now();
    for _ in 0..ITERATIONS {
        yaml_to_json(yaml.as_bytes()).expect("Failed to convert YAML to JSON");
    }
    let to_json = start.elapsed() / ITERATIONS;

    let start = Instant::now();
    for _ in 0..ITERATIONS {
        json_to_yaml(&json, DEFAULT_INDENT).expect("Failed to convert JSON to YAML");
    }
    let to_yaml = start.elapsed() / ITERATIONS;

    (to_json, to_yaml)
}

fn test_scaling(name: &str, generator: impl Fn(usize) -> String, sizes: &[usize]) {
    println!("\n{}", "=".repeat(70));
    println!("Scaling Test: {}", name);
    println!("{}", "=".repeat(70));
    println!(
        "{:>6} {:>12} {:>14} {:>14}",
        "Size", "Input bytes", "YAML->JSON", "JSON->YAML"
    );
    println!("{}", "-".repeat(70));

    let mut results = Vec::new();

    for &size in sizes {
        let yaml_content = generator(size);
        let (to_json, to_yaml) = time_round_trip(&yaml_content);

        println!(
            "{:>6} {:>12} {:>14?} {:>14?}",
            size,
            yaml_content.len(),
            to_json,
            to_yaml
        );

        results.push(ScalingResult {
            size,
            to_json,
            to_yaml,
        });
    }

    println!("\nScaling Analysis:");

    if let (Some(first), Some(last)) = (results.first(), results.last()) {
        let size_ratio = last.size as f64 / first.size as f64;
        let json_ratio = last.to_json.as_secs_f64() / first.to_json.as_secs_f64();
        let yaml_ratio = last.to_yaml.as_secs_f64() / first.to_yaml.as_secs_f64();

        println!("  Size increased:          {:.1}x", size_ratio);
        println!("  YAML->JSON time increased: {:.1}x", json_ratio);
        println!("  JSON->YAML time increased: {:.1}x", yaml_ratio);

        for (label, ratio) in [("YAML->JSON", json_ratio), ("JSON->YAML", yaml_ratio)] {
            let growth = ratio / size_ratio;
            if growth < 1.5 {
                println!("  ✅ {} scales linearly ({:.2}x per unit of size)", label, growth);
            } else {
                println!("  ⚠️  {} grows faster than its input ({:.2}x)", label, growth);
            }
        }
    }
}

fn main() {
    println!("Conversion Scaling Analysis");
    println!("=============================================================");
    println!("Testing whether conversion time grows linearly with data size");

    let flat_sizes = [10, 50, 100, 250, 500, 1000];
    test_scaling("Flat Array", generate_flat_array, &flat_sizes);
    test_scaling("Flat Hash", generate_flat_hash, &flat_sizes);

    // Merge keys are expanded once per section.
    test_scaling("Merged Sections", generate_merged_sections, &[5, 10, 20, 50, 100]);

    // depth=5, breadth 2..=5 gives 32 to 3125 leaves.
    test_scaling(
        "Nested Structure",
        |breadth| generate_nested_structure(5, breadth),
        &[2, 3, 4, 5],
    );
}
