use std::fs;

use storyline::{
    Collection, Configuration, Event, StoryRunner,
    cli::Coloring,
    parser::FileSystem,
    reporter::{Basic, Delegating, Ext as _, Recorder, out::WritableString},
};

fn steps() -> Collection<Vec<String>> {
    Collection::<Vec<String>>::builder()
        .given("a user named $name", |w: &mut Vec<String>, ctx| {
            w.push(ctx.text(0)?.to_owned());
            Ok(())
        })
        .when("the user logs in", |_: &mut Vec<String>, _| Ok(()))
        .build()
        .unwrap()
}

#[test]
fn stories_are_loaded_from_files_and_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("stories")).unwrap();
    fs::write(
        dir.path().join("stories/login.story"),
        "Scenario: Login\n\
         GivenStories: stories/setup.story\n\
         When the user logs in\n\
         Then the dashboard shows\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("stories/setup.story"),
        "Given a user named Ann\n",
    )
    .unwrap();

    let loader = FileSystem::new(dir.path());
    assert_eq!(
        loader.find_paths("**/*.story").unwrap(),
        ["stories/login.story", "stories/setup.story"],
    );

    let config = Configuration::builder().story_loader(loader).build();
    let mut runner = StoryRunner::new(config).with_collection(steps());
    let mut world = Vec::new();
    let mut basic =
        Basic::new(WritableString::default(), Coloring::Never).summarized();

    runner
        .run_path(&mut world, "stories/login.story", &mut basic)
        .unwrap();

    assert_eq!(world, ["Ann"]);
    let out = basic.into_inner().into_output().0;
    assert!(
        out.starts_with(
            "Story: stories/login.story\n\
             \x20 Scenario: Login\n\
             \x20   GivenStories: stories/setup.story\n\
             \x20   Given story: stories/setup.story\n\
             \x20     Scenario: \n\
             \x20       \u{2714}  Given a user named Ann\n\
             \x20   \u{2714}  When the user logs in\n\
             \x20   ?  Then the dashboard shows (PENDING)\n\
             [Summary]\n\
             2 stories\n\
             2 scenarios (1 passed, 1 pending)\n\
             3 steps (2 passed, 1 pending)\n",
        ),
        "unexpected output:\n{out}",
    );
}

#[test]
fn delegating_feeds_every_reporter_the_same_events() {
    let config = Configuration::default();
    let story = config
        .story_parser()
        .parse("Given a user named Bob\nWhen the user logs in", None);
    let mut runner = StoryRunner::new(config).with_collection(steps());
    let (mut recorder, mut silent) =
        (Recorder::new(), Recorder::new().silent_success());

    {
        let mut delegating = Delegating::new()
            .with(&mut recorder)
            .with(&mut silent);
        runner
            .run(&mut Vec::new(), story, &mut delegating)
            .unwrap();
    }

    assert_eq!(recorder.events().len(), 6);
    assert!(matches!(
        recorder.events()[0],
        Event::BeforeStory { embedded: false, .. },
    ));
    assert!(matches!(
        recorder.events()[5],
        Event::AfterStory { embedded: false },
    ));
    // Nothing went wrong, so only the story events get through.
    assert_eq!(silent.into_inner().events().len(), 2);
}
