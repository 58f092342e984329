//! One configured discovery run.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use subgroupforge_config::SearchConfig;
use subgroupforge_core::{
    CatalogOptions, ConstraintCatalog, Dataset, Group, PrimeAllocator, Result, SubgroupError,
};
use subgroupforge_scoring::score_catalog;
use subgroupforge_search::{
    BeamSearch, EvaluatorBuilder, RefinementBuilder, SearchEvent, SearchOutcome, SearchSettings,
    TerminationBuilder,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// Wires a [`SearchConfig`] into a beam search over one dataset.
///
/// # Example
///
/// ```
/// use subgroupforge::{load_arff_str, Discovery, LoadOptions, SearchConfig};
///
/// let data = load_arff_str(
///     "@relation r\n@attribute x numeric\n@attribute y {0,1}\n@data\n1,0\n2,0\n3,1\n4,1\n",
///     &LoadOptions::default(),
/// )
/// .unwrap();
/// let config = SearchConfig::from_toml_str("thread_count = \"none\"").unwrap();
/// let outcome = Discovery::new(config).run(&data).unwrap();
/// assert_eq!(outcome.best().unwrap().describe(), "x >= 3.0");
/// ```
#[derive(Debug, Clone)]
pub struct Discovery {
    config: SearchConfig,
    flag: Option<Arc<AtomicBool>>,
    sender: Option<UnboundedSender<SearchEvent>>,
}

impl Discovery {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            flag: None,
            sender: None,
        }
    }

    /// Stops the search at the next level boundary once `flag` is set.
    pub fn with_termination_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.flag = Some(flag);
        self
    }

    pub fn with_event_sender(mut self, sender: UnboundedSender<SearchEvent>) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Builds the catalog, evaluator and seed, then runs the search.
    ///
    /// Blacklisted names absent from `dataset` are ignored, since the loader
    /// may already have dropped them.
    pub fn run(&self, dataset: &Dataset) -> Result<SearchOutcome> {
        let config = &self.config;
        config
            .validate()
            .map_err(|e| SubgroupError::InvalidSettings(e.to_string()))?;

        let options = CatalogOptions {
            missing: config.missing_values,
            ordered_equality: config.ordered_equality,
        };
        let mut catalog = ConstraintCatalog::build(dataset, &mut PrimeAllocator::new(), options);

        let evaluator = EvaluatorBuilder::build(config, dataset)?;
        let refinement = RefinementBuilder::build(&config.refinement);
        if refinement.requires_scores() {
            score_catalog(evaluator.as_ref(), &mut catalog, dataset);
        }

        let seed = self.seed(dataset, &catalog)?;

        let blacklist: Vec<usize> = config
            .blacklist
            .iter()
            .filter_map(|name| {
                let id = dataset.attribute_id(name);
                if id.is_none() {
                    debug!(event = "blacklist_absent", attribute = name.as_str());
                }
                id
            })
            .collect();

        let mut search = BeamSearch::new(SearchSettings::from_config(config), refinement)
            .with_blacklist(blacklist);
        if let Some(termination) = TerminationBuilder::build(config, self.flag.clone()) {
            search = search.with_termination(termination);
        }
        if let Some(sender) = &self.sender {
            search = search.with_event_sender(sender.clone());
        }

        search.run(dataset, &catalog, evaluator.as_ref(), seed)
    }

    fn seed(&self, dataset: &Dataset, catalog: &ConstraintCatalog) -> Result<Group> {
        let constraints = self
            .config
            .seed
            .iter()
            .map(|text| catalog.lookup(dataset, text))
            .collect::<Result<Vec<_>>>()?;
        Group::from_constraints(constraints)?.ok_or_else(|| {
            SubgroupError::InvalidSettings(format!(
                "seed constraints [{}] are redundant",
                self.config.seed.join(", ")
            ))
        })
    }
}
