use std::sync::{Arc, Mutex};

use storyline::{
    Collection, Configuration, Error, Event, ExamplesTable, Scenario, Story,
    StoryRunner,
    error::StepError,
    parser::InMemory,
    reporter::{Ext as _, Recorder},
    step::UponOutcome,
    strategy::{ErrorStrategy, PendingStepStrategy, SilentlyAbsorbing},
};

fn init_logging() {
    _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default)]
struct World {
    log: Vec<String>,
}

fn steps() -> Collection<World> {
    Collection::<World>::builder()
        .given("step $name", |w: &mut World, ctx| {
            w.log.push(ctx.text(0)?.to_owned());
            Ok(())
        })
        .when("it fails", |_: &mut World, _| anyhow::bail!("it failed"))
        .then("it panics", |_: &mut World, _| panic!("it panicked"))
        .build()
        .unwrap()
}

#[derive(Clone, Debug, Default)]
struct Spy(Arc<Mutex<Vec<Option<String>>>>);

impl Spy {
    fn record(&self, error: Option<&StepError>) -> Result<(), StepError> {
        self.0.lock().unwrap().push(error.map(ToString::to_string));
        Ok(())
    }

    fn calls(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

impl PendingStepStrategy for Spy {
    fn handle(&self, error: Option<&StepError>) -> Result<(), StepError> {
        self.record(error)
    }
}

impl ErrorStrategy for Spy {
    fn handle(&self, error: Option<&StepError>) -> Result<(), StepError> {
        self.record(error)
    }
}

fn outcomes(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|ev| {
            let outcome = ev.as_outcome()?;
            let kind = match ev {
                Event::Successful(_) => "ok",
                Event::Failed(..) => "failed",
                Event::Pending(_) => "pending",
                Event::NotPerformed(_) => "not performed",
                _ => "ignorable",
            };
            Some(format!("{kind}: {}", outcome.text()))
        })
        .collect()
}

#[test]
fn pending_step_stops_the_sequence_and_reaches_the_strategy() {
    init_logging();
    let (pending, errors) = (Spy::default(), Spy::default());
    let config = Configuration::builder()
        .pending_strategy(pending.clone())
        .error_strategy(errors.clone())
        .build();
    let mut runner = StoryRunner::new(config).with_collection(steps());
    let story = Story::new(vec![Scenario::new(
        "pending",
        ["Given step a", "When nothing matches", "Given step b"],
    )]);
    let (mut world, mut recorder) = (World::default(), Recorder::new());

    runner.run(&mut world, story, &mut recorder).unwrap();

    assert_eq!(
        outcomes(recorder.events()),
        [
            "ok: Given step a",
            "pending: When nothing matches",
            "not performed: Given step b",
        ],
    );
    assert_eq!(world.log, ["a"]);
    assert_eq!(pending.calls(), 1);
    assert_eq!(errors.calls(), 0);
}

#[test]
fn steps_after_a_failure_are_not_performed() {
    init_logging();
    let config = Configuration::builder()
        .error_strategy(SilentlyAbsorbing)
        .build();
    let mut runner = StoryRunner::new(config).with_collection(steps());
    let story = Story::new(vec![
        Scenario::new(
            "broken",
            [
                "Given step a",
                "Then it panics",
                "When it fails",
                "!-- note",
                "Given step b",
            ],
        ),
        Scenario::new("fine again", ["Given step c"]),
    ]);
    let mut summarized = Recorder::new().summarized();

    runner
        .run(&mut World::default(), story, &mut summarized)
        .unwrap();

    let stats = *summarized.steps_stats();
    assert_eq!(stats.passed, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.not_performed, 2);
    assert_eq!(stats.ignorable, 1);
    assert_eq!(stats.total(), 6);
    assert_eq!(summarized.scenarios_stats().failed, 1);
    assert_eq!(summarized.scenarios_stats().passed, 1);

    let failure = summarized
        .into_inner()
        .into_events()
        .into_iter()
        .find_map(|ev| match ev {
            Event::Failed(_, e) => Some(e.to_string()),
            _ => None,
        })
        .unwrap();
    assert_eq!(failure, "`Then it panics` panicked: it panicked");
}

#[test]
fn examples_table_rows_run_in_order() {
    let table = ExamplesTable::parse("|name|\n|first|\n|second|\n|third|");
    let story = Story::new(vec![
        Scenario::new("outline", ["Given step <name>"]).with_examples(table),
    ]);
    let mut runner =
        StoryRunner::new(Configuration::default()).with_collection(steps());
    let (mut world, mut recorder) = (World::default(), Recorder::new());

    runner.run(&mut world, story, &mut recorder).unwrap();

    assert_eq!(world.log, ["first", "second", "third"]);
    let events = recorder.events();
    let before = events
        .iter()
        .position(|ev| matches!(ev, Event::BeforeExamples { .. }))
        .unwrap();
    let after = events
        .iter()
        .position(|ev| matches!(ev, Event::AfterExamples))
        .unwrap();
    let rows = events[before..after]
        .iter()
        .filter(|ev| matches!(ev, Event::Example(_)))
        .count();
    assert_eq!(rows, 3);
    assert_eq!(
        events
            .iter()
            .filter(|ev| matches!(ev, Event::BeforeExamples { .. }))
            .count(),
        1,
    );
}

#[test]
fn given_stories_run_embedded_before_the_steps() {
    init_logging();
    let loader = InMemory::new()
        .with_story("path/one", "Scenario: one\nGiven step one")
        .with_story("path/two", "Scenario: two\nGiven step two");
    let config = Configuration::builder().story_loader(loader).build();
    let mut runner = StoryRunner::new(config).with_collection(steps());
    let story = Configuration::default().story_parser().parse(
        "Scenario: main\nGivenStories: path/one,path/two\nGiven step main",
        Some("main.story"),
    );
    let (mut world, mut recorder) = (World::default(), Recorder::new());

    runner.run(&mut world, story, &mut recorder).unwrap();

    assert_eq!(world.log, ["one", "two", "main"]);
    let embedded = recorder
        .events()
        .iter()
        .filter_map(|ev| match ev {
            Event::BeforeStory { story, embedded } => {
                Some((story.path().to_owned(), *embedded))
            }
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(
        embedded,
        [
            ("main.story".to_owned(), false),
            ("path/one".to_owned(), true),
            ("path/two".to_owned(), true),
        ],
    );
    assert!(matches!(
        &recorder.events()[2],
        Event::GivenStories(paths) if paths == &["path/one", "path/two"],
    ));
}

#[test]
fn pending_in_a_given_story_reaches_the_strategy_once() {
    let spy = Spy::default();
    let loader = InMemory::new().with_story("given", "Given undefined step");
    let config = Configuration::builder()
        .story_loader(loader)
        .pending_strategy(spy.clone())
        .build();
    let mut runner = StoryRunner::new(config).with_collection(steps());
    let story = Story::new(vec![
        Scenario::new("main", ["Given step a"]).with_given_stories(["given"]),
    ]);
    let mut world = World::default();

    runner.run(&mut world, story, &mut Recorder::new()).unwrap();

    assert_eq!(world.log, ["a"]);
    assert_eq!(
        *spy.0.lock().unwrap(),
        [Some("Step `Given undefined step` is pending".to_owned())],
    );
}

#[test]
fn story_hooks_follow_given_story_flag() {
    let hooks = Collection::<World>::builder()
        .before_story(false, |w: &mut World| {
            w.log.push("before top".into());
            Ok(())
        })
        .before_story(true, |w: &mut World| {
            w.log.push("before given".into());
            Ok(())
        })
        .after_story(false, |w: &mut World| {
            w.log.push("after top".into());
            Ok(())
        })
        .build()
        .unwrap();
    let loader = InMemory::new().with_story("given", "Given step given");
    let config = Configuration::builder().story_loader(loader).build();
    let mut runner = StoryRunner::new(config)
        .with_collection(steps())
        .with_collection(hooks);
    let story = Story::new(vec![
        Scenario::new("main", ["Given step main"])
            .with_given_stories(["given"]),
    ]);
    let mut world = World::default();

    runner.run(&mut world, story, &mut Recorder::new()).unwrap();

    assert_eq!(
        world.log,
        ["before top", "before given", "given", "main", "after top"],
    );
}

#[test]
fn failing_hook_is_reported_failed() {
    let hooks = Collection::<World>::builder()
        .before_scenario(|_: &mut World| anyhow::bail!("no database"))
        .build()
        .unwrap();
    let mut runner = StoryRunner::new(Configuration::default())
        .with_collection(steps())
        .with_collection(hooks);
    let story = Story::new(vec![Scenario::new("s", ["Given step a"])]);
    let mut recorder = Recorder::new();

    let err = runner
        .run(&mut World::default(), story, &mut recorder)
        .unwrap_err();

    assert!(err.to_string().contains("no database"));
    assert_eq!(
        outcomes(recorder.events()),
        ["failed: @BeforeScenario", "not performed: Given step a"],
    );
}

#[test]
fn after_scenario_hooks_run_after_a_failure() {
    let hooks = Collection::<World>::builder()
        .after_scenario(|w: &mut World| {
            w.log.push("after".into());
            Ok(())
        })
        .after_scenario_upon(UponOutcome::Success, |w: &mut World| {
            w.log.push("after success".into());
            Ok(())
        })
        .build()
        .unwrap();
    let config = Configuration::builder()
        .error_strategy(SilentlyAbsorbing)
        .build();
    let mut runner = StoryRunner::new(config)
        .with_collection(steps())
        .with_collection(hooks);
    let story = Story::new(vec![
        Scenario::new("broken", ["When it fails", "Given step a"]),
        Scenario::new("fine", ["Given step b"]),
    ]);
    let (mut world, mut recorder) = (World::default(), Recorder::new());

    runner.run(&mut world, story, &mut recorder).unwrap();

    assert_eq!(world.log, ["after", "b", "after", "after success"]);
    assert_eq!(
        outcomes(recorder.events()),
        [
            "failed: When it fails",
            "not performed: Given step a",
            "ok: Given step b",
        ],
    );
}

#[test]
fn missing_given_story_still_closes_the_story() {
    let story = || {
        Story::new(vec![
            Scenario::new("main", ["Given step main"])
                .with_given_stories(["missing.story"]),
        ])
    };
    let mut runner = StoryRunner::new(
        Configuration::builder().story_loader(InMemory::new()).build(),
    )
    .with_collection(steps());
    let mut recorder = Recorder::new();

    let err = runner
        .run(&mut World::default(), story(), &mut recorder)
        .unwrap_err();

    assert!(matches!(err, Error::Load(_)));
    let events = recorder.into_events();
    assert!(matches!(
        events.last(),
        Some(Event::AfterStory { embedded: false }),
    ));
    assert_eq!(
        events
            .iter()
            .filter(|ev| matches!(ev, Event::BeforeScenario(_)))
            .count(),
        events
            .iter()
            .filter(|ev| matches!(ev, Event::AfterScenario))
            .count(),
    );

    // Reusing the runner doesn't mistake the story for a recursive one.
    let err = runner
        .run(&mut World::default(), story(), &mut Recorder::new())
        .unwrap_err();
    assert!(matches!(err, Error::Load(_)));
}
