use std::cmp::Ordering;
use std::env;
use std::process::Command;

// CPU features that select an accelerated kernel set
#[derive(PartialEq, Eq, Debug)]
struct CpuFeature {
    name: &'static str,
    cfg_flag: &'static str,
    detected: bool,
}

impl CpuFeature {
    // Lowest number == highest priority
    fn priority(&self) -> usize {
        match self.name {
            "avx512f" => 0,
            "avx2" => 1,
            "sse4_1" => 2,
            "neon" => 3,
            _ => usize::MAX,
        }
    }

    fn features() -> Vec<CpuFeature> {
        [
            ("sse4_1", "sse"),
            ("avx512f", "avx512"),
            ("avx2", "avx2"),
            ("neon", "neon"),
        ]
        .into_iter()
        .map(|(name, cfg_flag)| CpuFeature {
            name,
            cfg_flag,
            detected: false,
        })
        .collect()
    }
}

impl Ord for CpuFeature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for CpuFeature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

trait CpuFeatureDetector {
    fn detect_features(&self, features: &mut [CpuFeature]);
    fn is_applicable(&self) -> bool;
}

struct LinuxDetector;
impl CpuFeatureDetector for LinuxDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        if let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo") {
            let flags = cpuinfo.to_lowercase();
            let words: Vec<&str> = flags.split_whitespace().collect();
            for feature in features.iter_mut() {
                // aarch64 reports NEON as "asimd"
                feature.detected = match feature.name {
                    "neon" => words.contains(&"asimd") || words.contains(&"neon"),
                    name => words.contains(&name),
                };
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "linux")
    }
}

struct MacOSDetector;
impl CpuFeatureDetector for MacOSDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        let output = Command::new("sysctl").args(["-a"]).output();

        if let Ok(output) = output {
            let contents = String::from_utf8_lossy(&output.stdout).to_lowercase();

            for feature in features.iter_mut() {
                feature.detected = match feature.name {
                    "avx512f" => contents.contains("hw.optional.avx512f: 1"),
                    "avx2" => contents.contains("hw.optional.avx2_0: 1"),
                    "sse4_1" => contents.contains("hw.optional.sse4_1: 1"),
                    "neon" => contents.contains("hw.optional.neon: 1"),
                    _ => false,
                };
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "macos")
    }
}

struct PlatformDetector;
impl PlatformDetector {
    fn cpu_features_detectors() -> Vec<Box<dyn CpuFeatureDetector>> {
        vec![Box::new(LinuxDetector), Box::new(MacOSDetector)]
    }

    fn detect_cpu_features(features: &mut [CpuFeature]) {
        if let Some(detector) = Self::cpu_features_detectors()
            .into_iter()
            .find(|detector| detector.is_applicable())
        {
            detector.detect_features(features);
        }
    }

    fn apply(features: &mut [CpuFeature]) {
        features.sort();

        // The highest-priority detected feature wins; nothing detected means
        // the portable path only.
        let cfg_flag = features
            .iter()
            .find(|cpu_feature| cpu_feature.detected)
            .map_or("fallback", |cpu_feature| cpu_feature.cfg_flag);

        println!("cargo:rustc-cfg={cfg_flag}");

        println!("cargo::rustc-check-cfg=cfg(avx512)");
        println!("cargo::rustc-check-cfg=cfg(avx2)");
        println!("cargo::rustc-check-cfg=cfg(sse)");
        println!("cargo::rustc-check-cfg=cfg(neon)");
        println!("cargo::rustc-check-cfg=cfg(fallback)");
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let mut features = CpuFeature::features();

    // Probing the build machine only describes the target for native builds
    let host = env::var("HOST").unwrap_or_default();
    let target = env::var("TARGET").unwrap_or_default();

    if host == target {
        PlatformDetector::detect_cpu_features(&mut features);
    }

    PlatformDetector::apply(&mut features);
}
