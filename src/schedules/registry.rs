//! Schedule lookup by id, label, or alias.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{Result, ScheduleError};
use crate::schedules::{Generator, ScheduleDescriptor, analytic, ays, host_based};

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// The process-wide registry of built-in schedules.
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::builtin)
}

/// Resolve a key against the process-wide registry.
pub fn resolve(key: &str) -> Result<&'static ScheduleDescriptor> {
    registry().resolve(key)
}

#[derive(Debug, Default)]
pub struct Registry {
    descriptors: Vec<ScheduleDescriptor>,
    index: HashMap<&'static str, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All built-in schedules, in display order.
    pub fn builtin() -> Self {
        use Generator::{Analytic, Automatic, Host};

        let mut registry = Self::new();
        let entries = [
            ScheduleDescriptor::new("automatic", "Automatic", Automatic),
            ScheduleDescriptor::new("karras", "Karras", Analytic(analytic::karras))
                .with_default_rho(7.0),
            ScheduleDescriptor::new(
                "exponential",
                "Exponential",
                Analytic(analytic::exponential),
            ),
            ScheduleDescriptor::new(
                "polyexponential",
                "Polyexponential",
                Analytic(analytic::polyexponential),
            )
            .with_default_rho(1.0),
            ScheduleDescriptor::new(
                "sinusoidal_sf",
                "Sinusoidal SF",
                Analytic(analytic::sinusoidal_sf),
            ),
            ScheduleDescriptor::new(
                "invcosinusoidal_sf",
                "Invcosinusoidal SF",
                Analytic(analytic::invcosinusoidal_sf),
            ),
            ScheduleDescriptor::new(
                "react_cosinusoidal_dynsf",
                "React Cosinusoidal DynSF",
                Analytic(analytic::react_cosinusoidal_dynsf),
            ),
            ScheduleDescriptor::new("uniform", "Uniform", Host(host_based::uniform)),
            ScheduleDescriptor::new("sgm_uniform", "SGM Uniform", Host(host_based::sgm_uniform))
                .with_aliases(&["SGMUniform"]),
            ScheduleDescriptor::new("kl_optimal", "KL Optimal", Analytic(analytic::kl_optimal)),
            ScheduleDescriptor::new("simple", "Simple", Host(host_based::simple)),
            ScheduleDescriptor::new("normal", "Normal", Host(host_based::normal)),
            ScheduleDescriptor::new("ddim", "DDIM", Host(host_based::ddim)),
            ScheduleDescriptor::new(
                "align_your_steps",
                "Align Your Steps",
                Analytic(ays::align_your_steps),
            ),
            ScheduleDescriptor::new(
                "align_your_steps_custom",
                "Align Your Steps Custom",
                Analytic(ays::align_your_steps_custom),
            ),
            ScheduleDescriptor::new("beta", "Beta", Host(host_based::beta)),
            ScheduleDescriptor::new("turbo", "Turbo", Host(host_based::turbo)),
            ScheduleDescriptor::new("cosine", "Cosine", Analytic(analytic::cosine)),
            ScheduleDescriptor::new(
                "cosine-exponential blend",
                "Cosine-exponential Blend",
                Analytic(analytic::cosine_exponential_blend),
            ),
            ScheduleDescriptor::new("phi", "Phi", Analytic(analytic::phi)),
            ScheduleDescriptor::new("laplace", "Laplace", Analytic(analytic::laplace)),
            ScheduleDescriptor::new(
                "karras dynamic",
                "Karras Dynamic",
                Analytic(analytic::karras_dynamic),
            ),
            ScheduleDescriptor::new(
                "align_your_steps_GITS",
                "Align Your Steps GITS",
                Analytic(ays::align_your_steps_gits),
            ),
            ScheduleDescriptor::new(
                "align_your_steps_11",
                "Align Your Steps 11",
                Analytic(ays::align_your_steps),
            ),
            ScheduleDescriptor::new(
                "align_your_steps_32",
                "Align Your Steps 32",
                Analytic(ays::align_your_steps_32),
            ),
        ];
        for descriptor in entries {
            registry.register(descriptor);
        }
        registry
    }

    /// Add a descriptor under its id, label, and aliases.
    ///
    /// # Panics
    /// Panics if any of its keys already belongs to another descriptor.
    pub fn register(&mut self, descriptor: ScheduleDescriptor) {
        let slot = self.descriptors.len();
        for key in descriptor.keys() {
            if let Some(&existing) = self.index.get(key) {
                if existing != slot {
                    panic!(
                        "schedule key '{key}' of '{}' is already registered by '{}'",
                        descriptor.id, self.descriptors[existing].id
                    );
                }
            }
            self.index.insert(key, slot);
        }
        self.descriptors.push(descriptor);
    }

    pub fn resolve(&self, key: &str) -> Result<&ScheduleDescriptor> {
        self.index
            .get(key)
            .map(|&slot| &self.descriptors[slot])
            .ok_or_else(|| ScheduleError::UnknownSchedule { key: key.to_string() })
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduleDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelFamily, ScheduleConfig, SigmaRange};
    use crate::host::DiscreteHostModel;

    #[test]
    fn builtin_has_every_schedule() {
        let registry = Registry::builtin();
        assert_eq!(registry.len(), 25);
        assert_eq!(registry.iter().next().map(|d| d.id), Some("automatic"));
    }

    #[test]
    fn id_label_and_alias_share_one_descriptor() {
        let registry = Registry::builtin();
        for descriptor in registry.iter() {
            let by_id = registry.resolve(descriptor.id).unwrap();
            let by_label = registry.resolve(descriptor.label).unwrap();
            assert!(std::ptr::eq(by_id, by_label), "{}", descriptor.id);
            assert!(std::ptr::eq(by_id, descriptor));
        }
        let by_alias = registry.resolve("SGMUniform").unwrap();
        assert!(std::ptr::eq(by_alias, registry.resolve("sgm_uniform").unwrap()));
    }

    #[test]
    fn unknown_key_is_not_found() {
        let err = Registry::builtin().resolve("karras2").unwrap_err();
        assert_eq!(err, ScheduleError::UnknownSchedule { key: "karras2".to_string() });
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn duplicate_key_fails_fast() {
        let mut registry = Registry::builtin();
        registry.register(ScheduleDescriptor::new(
            "karras_v2",
            "Karras",
            Generator::Analytic(analytic::karras),
        ));
    }

    #[test]
    fn metadata_matches_generator_kind() {
        let registry = Registry::builtin();
        let host_ids: Vec<&str> = registry
            .iter()
            .filter(|d| d.needs_host_model())
            .map(|d| d.id)
            .collect();
        assert_eq!(
            host_ids,
            ["uniform", "sgm_uniform", "simple", "normal", "ddim", "beta", "turbo"]
        );
        assert_eq!(registry.resolve("karras").unwrap().default_rho, Some(7.0));
        assert_eq!(registry.resolve("Polyexponential").unwrap().default_rho, Some(1.0));
        assert_eq!(registry.resolve("phi").unwrap().default_rho, None);
    }

    #[test]
    fn generate_dispatches_on_generator_kind() {
        let range = SigmaRange::new(0.03, 14.6).unwrap();
        let config = ScheduleConfig::default();
        let host = DiscreteHostModel::stable_diffusion();

        let automatic = resolve("automatic").unwrap();
        assert_eq!(
            automatic.generate(10, &range, &config, Some(&host)),
            Err(ScheduleError::Automatic)
        );

        let ddim = resolve("DDIM").unwrap();
        assert_eq!(
            ddim.generate(10, &range, &config, None),
            Err(ScheduleError::MissingHostModel { id: "ddim".to_string() })
        );
        assert_eq!(ddim.generate(10, &range, &config, Some(&host)).unwrap().len(), 11);

        // Analytic generators ignore the host.
        let karras = resolve("karras").unwrap();
        assert_eq!(
            karras.generate(10, &range, &config, None).unwrap(),
            karras.generate(10, &range, &config, Some(&host)).unwrap()
        );
    }

    #[test]
    fn generate_rejects_invalid_config() {
        let range = SigmaRange::new(0.03, 14.6).unwrap();
        let config = ScheduleConfig {
            karras_rho: f64::NAN,
            ..ScheduleConfig::default()
        };
        let err = resolve("karras").unwrap().generate(5, &range, &config, None).unwrap_err();
        assert!(matches!(err, ScheduleError::Config(_)));
    }

    #[test]
    fn family_tables_follow_the_config_not_the_host() {
        let range = SigmaRange::new(0.03, 14.6).unwrap();
        let host = DiscreteHostModel::stable_diffusion();
        let ays = resolve("align_your_steps").unwrap();

        let sd15 = ays.generate(11, &range, &ScheduleConfig::default(), Some(&host)).unwrap();
        assert_eq!(sd15[1], 6.475);

        let sdxl_config = ScheduleConfig {
            model_family: ModelFamily::Sdxl,
            ..ScheduleConfig::default()
        };
        let sdxl = ays.generate(11, &range, &sdxl_config, Some(&host)).unwrap();
        assert_eq!(sdxl[1], 6.315);
        assert_eq!(sdxl, ays.generate(11, &range, &sdxl_config, None).unwrap());
    }
}
