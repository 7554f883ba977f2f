//! Warnings Processor Regression Tests
//!
//! End-to-end behaviour of `WarningsProcessor::process`: preconditions,
//! rule priority, short-circuiting, partial definition gaps, and the
//! fallback to the candidate notification when a risk rule fails.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use content_testing_warnings::candidates::{ConfiguredInitiator, StaticCandidatesPipeline};
use content_testing_warnings::config::defaults::CREATE_TEST_COMMAND;
use content_testing_warnings::config::TextsConfig;
use content_testing_warnings::storage::{
    InMemoryContentTestStore, InMemoryDefinitionReader, InMemoryTestingSearch,
};
use content_testing_warnings::{
    Candidate, CollaboratorError, Collaborators, ContentEditorWarningsArgs, ContentTestStore,
    DataUri, Experiment, Item, ItemUri, TestCandidatesPipeline, TestDefinition,
    TestDefinitionReader, TestInitiator, TestingConfig, TestingSearch, WarningsError,
    WarningsProcessor,
};

// ============================================================================
// Spy collaborators
// ============================================================================

/// Wraps the in-memory store, counts calls, optionally fails every query.
struct SpyStore {
    inner: InMemoryContentTestStore,
    fail: bool,
    active_calls: AtomicUsize,
    all_calls: AtomicUsize,
}

impl SpyStore {
    fn new(fail: bool) -> Self {
        Self {
            inner: InMemoryContentTestStore::new(),
            fail,
            active_calls: AtomicUsize::new(0),
            all_calls: AtomicUsize::new(0),
        }
    }
}

impl ContentTestStore for SpyStore {
    fn active_tests(&self, item: &DataUri) -> Result<Vec<Experiment>, CollaboratorError> {
        self.active_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CollaboratorError::Unavailable("store offline".to_string()));
        }
        self.inner.active_tests(item)
    }

    fn all_tests_for_item(&self, item: &DataUri) -> Result<Vec<Experiment>, CollaboratorError> {
        self.all_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CollaboratorError::Unavailable("store offline".to_string()));
        }
        self.inner.all_tests_for_item(item)
    }

    fn backend_name(&self) -> &'static str {
        "spy"
    }
}

struct SpySearch {
    inner: InMemoryTestingSearch,
    fail: bool,
    calls: AtomicUsize,
}

impl SpySearch {
    fn new(fail: bool) -> Self {
        Self {
            inner: InMemoryTestingSearch::new(),
            fail,
            calls: AtomicUsize::new(0),
        }
    }
}

impl TestingSearch for SpySearch {
    fn running_tests_with_data_source(
        &self,
        item: &Item,
    ) -> Result<Vec<Experiment>, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CollaboratorError::Query("search index unreachable".to_string()));
        }
        self.inner.running_tests_with_data_source(item)
    }
}

struct SpyCandidates {
    inner: StaticCandidatesPipeline,
    fail: bool,
    calls: AtomicUsize,
}

impl TestCandidatesPipeline for SpyCandidates {
    fn run(&self, item: &Item) -> Result<Vec<Candidate>, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CollaboratorError::Query("candidate inspection crashed".to_string()));
        }
        self.inner.run(item)
    }
}

/// Definition reader whose lookups fail outright.
struct BrokenDefinitions;

impl TestDefinitionReader for BrokenDefinitions {
    fn resolve(&self, _uri: &ItemUri) -> Result<Option<TestDefinition>, CollaboratorError> {
        Err(CollaboratorError::Query("definition database timed out".to_string()))
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    store: Arc<SpyStore>,
    definitions: Arc<InMemoryDefinitionReader>,
    search: Arc<SpySearch>,
    candidates: Arc<SpyCandidates>,
    item: Item,
    config: TestingConfig,
    initiator: TestInitiator,
}

impl Harness {
    fn new() -> Self {
        Self::with_failures(false, false)
    }

    fn with_failures(store_fails: bool, candidates_fail: bool) -> Self {
        Self {
            store: Arc::new(SpyStore::new(store_fails)),
            definitions: Arc::new(InMemoryDefinitionReader::new()),
            search: Arc::new(SpySearch::new(false)),
            candidates: Arc::new(SpyCandidates {
                inner: StaticCandidatesPipeline::new(),
                fail: candidates_fail,
                calls: AtomicUsize::new(0),
            }),
            item: Item::new(ItemUri::new("master", "home", "en", 1), "Home"),
            config: TestingConfig::default(),
            initiator: TestInitiator::Notification,
        }
    }

    fn with_failing_search() -> Self {
        Self {
            search: Arc::new(SpySearch::new(true)),
            ..Self::new()
        }
    }

    fn collaborators(&self) -> Collaborators {
        Collaborators {
            test_store: self.store.clone(),
            definitions: self.definitions.clone(),
            search: self.search.clone(),
            candidates: self.candidates.clone(),
            initiator: Arc::new(ConfiguredInitiator::new(self.initiator)),
        }
    }

    fn processor(&self) -> WarningsProcessor {
        WarningsProcessor::new(Arc::new(self.config.clone()), self.collaborators())
    }

    fn run(&self) -> Result<ContentEditorWarningsArgs, WarningsError> {
        let mut args = ContentEditorWarningsArgs::new(Some(self.item.clone()));
        self.processor().process(&mut args)?;
        Ok(args)
    }

    /// Add a test hosted on the item with a resolvable definition.
    fn host_test(&self, id: &str, active: bool, suspended: bool) {
        let experiment = experiment(id, self.item.uri.to_data_uri(), active);
        self.definitions
            .insert(TestDefinition {
                uri: experiment.definition_uri.clone(),
                name: id.to_string(),
                is_suspended: suspended,
            })
            .unwrap();
        self.store.inner.insert(experiment).unwrap();
    }

    /// Add a hosted test whose definition item no longer exists.
    fn host_dangling_test(&self, id: &str) {
        self.store
            .inner
            .insert(experiment(id, self.item.uri.to_data_uri(), false))
            .unwrap();
    }

    /// Make a running test on another page use this item as a data source.
    fn feed_running_test(&self, id: &str) {
        let landing = ItemUri::new("master", "landing", "en", 1).to_data_uri();
        self.search
            .inner
            .index(self.item.uri.id.clone(), experiment(id, landing, true))
            .unwrap();
    }

    fn add_candidates(&self, ids: &[&str]) {
        for id in ids {
            self.candidates
                .inner
                .add(
                    self.item.uri.clone(),
                    Candidate {
                        id: (*id).to_string(),
                        discovered_by: "personalization-rules".to_string(),
                    },
                )
                .unwrap();
        }
    }

    /// Every fact at once: suspended + active hosted tests, a running test
    /// fed by the item, and candidates.
    fn everything(&self) {
        self.host_test("paused", false, true);
        self.host_test("live", true, false);
        self.feed_running_test("landing");
        self.add_candidates(&["carousel"]);
    }
}

fn experiment(id: &str, host: DataUri, active: bool) -> Experiment {
    Experiment {
        id: id.to_string(),
        definition_uri: ItemUri::new("master", format!("def-{id}"), "en", 1),
        host_item: host,
        is_active: active,
    }
}

fn titles(args: &ContentEditorWarningsArgs) -> Vec<&str> {
    args.warnings.iter().map(|w| w.title.as_str()).collect()
}

fn texts() -> TextsConfig {
    TextsConfig::default()
}

// ============================================================================
// Preconditions
// ============================================================================

#[test]
fn disabled_switch_adds_nothing_and_queries_nothing() {
    let mut h = Harness::new();
    h.everything();
    h.config.testing.automatic_content_testing_enabled = false;

    let args = h.run().unwrap();
    assert!(args.warnings.is_empty());
    assert_eq!(h.store.all_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.candidates.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn missing_item_adds_nothing() {
    let h = Harness::new();
    h.add_candidates(&["carousel"]);

    let mut args = ContentEditorWarningsArgs::new(None);
    h.processor().process(&mut args).unwrap();
    assert!(args.warnings.is_empty());
    assert_eq!(h.candidates.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn non_notification_initiators_add_nothing() {
    for initiator in [
        TestInitiator::Workflow,
        TestInitiator::Publish,
        TestInitiator::Disabled,
    ] {
        let mut h = Harness::new();
        h.everything();
        h.initiator = initiator;

        let args = h.run().unwrap();
        assert!(args.warnings.is_empty(), "initiator {initiator} produced warnings");
        assert_eq!(h.store.all_calls.load(Ordering::SeqCst), 0);
    }
}

// ============================================================================
// Rule priority
// ============================================================================

#[test]
fn suspended_and_active_yields_only_suspended_warning() {
    let h = Harness::new();
    h.everything();

    let args = h.run().unwrap();
    assert_eq!(titles(&args), [texts().this_page_has_suspended_test.as_str()]);
    assert_eq!(args.warnings[0].text, texts().fix_test_and_deploy_again);

    // Later rules never queried
    assert_eq!(h.store.active_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.search.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.candidates.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn active_test_without_suspension_yields_active_warning() {
    let h = Harness::new();
    h.host_test("live", true, false);
    h.feed_running_test("landing");
    h.add_candidates(&["carousel"]);

    let args = h.run().unwrap();
    assert_eq!(titles(&args), [texts().this_page_has_active_test.as_str()]);
    assert_eq!(args.warnings[0].text, texts().edit_could_have_negative_impact);
    assert_eq!(h.search.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.candidates.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn data_source_of_running_test_yields_part_of_test_warning() {
    let h = Harness::new();
    h.host_test("finished", false, false);
    h.feed_running_test("landing");
    h.add_candidates(&["carousel"]);

    let args = h.run().unwrap();
    assert_eq!(titles(&args), [texts().component_part_of_active_test.as_str()]);
    assert_eq!(
        args.warnings[0].text,
        texts().edit_could_affect_statistical_significance
    );
    assert_eq!(h.candidates.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn candidates_only_yields_create_test_notification() {
    let h = Harness::new();
    h.add_candidates(&["A", "B"]);

    let args = h.run().unwrap();
    assert_eq!(args.warnings.len(), 1);
    let warning = &args.warnings[0];
    assert_eq!(warning.title, texts().new_components_added);
    assert_eq!(warning.text, texts().do_you_want_to_create_a_test);
    assert_eq!(warning.options.len(), 1);
    assert_eq!(warning.options[0].label, texts().create_a_test);
    assert_eq!(warning.options[0].command, CREATE_TEST_COMMAND);
    assert_eq!(CREATE_TEST_COMMAND, "test:createTest");
}

#[test]
fn nothing_matches_and_no_candidates_adds_nothing() {
    let h = Harness::new();
    h.host_test("finished", false, false);

    let args = h.run().unwrap();
    assert!(args.warnings.is_empty());
    assert_eq!(h.candidates.calls.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Partial resolution and failures
// ============================================================================

#[test]
fn dangling_definition_does_not_hide_suspended_test() {
    let h = Harness::new();
    h.host_dangling_test("deleted-1");
    h.host_test("paused", false, true);
    h.host_dangling_test("deleted-2");

    let args = h.run().unwrap();
    assert_eq!(titles(&args), [texts().this_page_has_suspended_test.as_str()]);
}

#[test]
fn only_dangling_definitions_fall_through_to_active_check() {
    let h = Harness::new();
    h.host_dangling_test("deleted");
    h.host_test("live", true, false);

    let args = h.run().unwrap();
    assert_eq!(titles(&args), [texts().this_page_has_active_test.as_str()]);
}

#[test]
fn store_failure_is_swallowed_and_falls_back_to_candidates() {
    let h = Harness::with_failures(true, false);
    h.feed_running_test("landing");
    h.add_candidates(&["carousel"]);

    let args = h.run().unwrap();
    assert_eq!(titles(&args), [texts().new_components_added.as_str()]);

    // The failing rule stops the risk rules; no further risk queries
    assert_eq!(h.store.all_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.store.active_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.search.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn store_failure_without_candidates_adds_nothing() {
    let h = Harness::with_failures(true, false);

    let args = h.run().unwrap();
    assert!(args.warnings.is_empty());
}

#[test]
fn search_failure_falls_back_to_candidates() {
    let h = Harness::with_failing_search();
    h.host_test("draft", false, false);
    h.add_candidates(&["carousel"]);

    let args = h.run().unwrap();
    assert_eq!(titles(&args), [texts().new_components_added.as_str()]);
    assert_eq!(args.warnings[0].options.len(), 1);
    assert_eq!(args.warnings[0].options[0].command, CREATE_TEST_COMMAND);

    // Rules 1 and 2 declined before the search was queried
    assert_eq!(h.store.all_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.store.active_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.search.calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.candidates.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn search_failure_without_candidates_adds_nothing() {
    let h = Harness::with_failing_search();

    let args = h.run().unwrap();
    assert!(args.warnings.is_empty());
    assert_eq!(h.search.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn definition_reader_failure_falls_back_to_candidates() {
    let h = Harness::new();
    h.host_test("live", true, false);
    h.add_candidates(&["carousel"]);

    let collaborators = Collaborators {
        definitions: Arc::new(BrokenDefinitions),
        ..h.collaborators()
    };
    let processor = WarningsProcessor::new(Arc::new(h.config.clone()), collaborators);
    let mut args = ContentEditorWarningsArgs::new(Some(h.item.clone()));
    processor.process(&mut args).unwrap();

    assert_eq!(titles(&args), [texts().new_components_added.as_str()]);
}

#[test]
fn candidate_failure_propagates_to_host() {
    let h = Harness::with_failures(false, true);

    let err = h.run().unwrap_err();
    match err {
        WarningsError::Candidates { item, source } => {
            assert_eq!(item, h.item.uri);
            assert!(matches!(source, CollaboratorError::Query(_)));
        }
        other => panic!("expected candidate failure, got {other}"),
    }
}

#[test]
fn candidate_failure_after_store_failure_still_propagates() {
    let h = Harness::with_failures(true, true);
    assert!(matches!(h.run(), Err(WarningsError::Candidates { .. })));
}

// ============================================================================
// Helper predicates in isolation
// ============================================================================

#[test]
fn helper_predicates_report_whether_they_added() {
    let h = Harness::new();
    h.host_test("live", true, false);
    let processor = h.processor();
    let mut args = ContentEditorWarningsArgs::new(Some(h.item.clone()));

    assert!(!processor.add_suspended_test_warning(&mut args).unwrap());
    assert!(!processor.add_part_of_active_test_warning(&mut args).unwrap());
    assert!(args.warnings.is_empty());

    assert!(processor.add_active_test_warning(&mut args).unwrap());
    assert_eq!(titles(&args), [texts().this_page_has_active_test.as_str()]);
}

#[test]
fn helper_predicates_ignore_missing_item() {
    let h = Harness::new();
    h.everything();
    let processor = h.processor();
    let mut args = ContentEditorWarningsArgs::new(None);

    assert!(!processor.add_suspended_test_warning(&mut args).unwrap());
    assert!(!processor.add_active_test_warning(&mut args).unwrap());
    assert!(!processor.add_part_of_active_test_warning(&mut args).unwrap());
    processor.add_test_candidate_notification(&mut args).unwrap();
    assert!(args.warnings.is_empty());
}

#[test]
fn helper_predicate_errors_are_returned_not_swallowed() {
    let h = Harness::with_failures(true, false);
    let mut args = ContentEditorWarningsArgs::new(Some(h.item.clone()));
    assert!(h.processor().add_active_test_warning(&mut args).is_err());
    assert!(args.warnings.is_empty());
}

// ============================================================================
// Reuse and host-owned collection
// ============================================================================

#[test]
fn processor_is_reusable_across_requests() {
    let h = Harness::new();
    h.host_test("live", true, false);
    let processor = h.processor();

    for _ in 0..3 {
        let mut args = ContentEditorWarningsArgs::new(Some(h.item.clone()));
        processor.process(&mut args).unwrap();
        assert_eq!(args.warnings.len(), 1);
    }
}

#[test]
fn existing_host_warnings_are_preserved() {
    let h = Harness::new();
    h.host_test("live", true, false);

    let mut args = ContentEditorWarningsArgs::new(Some(h.item.clone()));
    args.add("Item is locked", "Another editor has locked this item.");
    h.processor().process(&mut args).unwrap();

    assert_eq!(
        titles(&args),
        ["Item is locked", texts().this_page_has_active_test.as_str()]
    );
}

#[test]
fn localized_texts_flow_into_warnings() {
    let mut h = Harness::new();
    h.add_candidates(&["carousel"]);
    h.config.texts.new_components_added = "Nye komponenter er tilføjet".to_string();
    h.config.texts.create_a_test = "Opret en test".to_string();

    let args = h.run().unwrap();
    assert_eq!(args.warnings[0].title, "Nye komponenter er tilføjet");
    assert_eq!(args.warnings[0].options[0].label, "Opret en test");
    assert_eq!(args.warnings[0].options[0].command, CREATE_TEST_COMMAND);
}
