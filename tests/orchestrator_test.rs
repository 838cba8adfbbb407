use openclaw_deploy::llm::LlmProvider;
use openclaw_deploy::wizard::{FnStep, Wizard, WizardState, WizardStep};
use openclaw_deploy::{DeployError, DeploymentResult, Platform};
use proptest::prelude::*;
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

fn recording_step(
    name: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
    apply: fn(WizardState) -> WizardState,
) -> Box<dyn WizardStep> {
    Box::new(FnStep::new(name, move |state: WizardState| {
        log.lock().unwrap().push(name);
        Ok(apply(state))
    }))
}

#[tokio::test]
async fn test_two_stub_steps_run_in_order_once() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let wizard = Wizard::new(vec![
        recording_step("platform", log.clone(), |s| s.with_platform(Platform::Local)),
        recording_step("provider", log.clone(), |s| {
            s.with_provider_key(
                LlmProvider::OpenAi,
                SecretString::from("sk-test-1234567890".to_string()),
                true,
            )
        }),
    ]);

    assert_eq!(wizard.step_names(), vec!["platform", "provider"]);

    let state = wizard
        .run(WizardState::new("/srv/openclaw"))
        .await
        .unwrap();

    assert_eq!(state.platform(), Some(Platform::Local));
    assert_eq!(state.provider(), Some(LlmProvider::OpenAi));
    assert_eq!(state.output_dir(), Path::new("/srv/openclaw"));
    assert_eq!(*log.lock().unwrap(), vec!["platform", "provider"]);
}

#[tokio::test]
async fn test_user_abort_propagates_unchanged() {
    let wizard = Wizard::new(vec![Box::new(FnStep::new("decline", |_s: WizardState| {
        Err(DeployError::UserAborted("Deployment aborted.".to_string()))
    }))]);

    let err = wizard.run(WizardState::new("/tmp")).await.unwrap_err();
    assert!(err.is_user_abort());
    assert_eq!(err.to_string(), "Deployment aborted.");
}

#[derive(Debug, Clone, Copy)]
enum Extension {
    Platform(usize),
    Provider(usize),
    Deployment(bool),
}

fn extend(state: WizardState, ext: Extension) -> WizardState {
    match ext {
        Extension::Platform(i) => state.with_platform(Platform::ALL[i % Platform::ALL.len()]),
        Extension::Provider(i) => state.with_provider_key(
            LlmProvider::ALL[i % LlmProvider::ALL.len()],
            SecretString::from("sk-prop-0123456789".to_string()),
            i % 2 == 0,
        ),
        Extension::Deployment(ok) => state.with_deployment(if ok {
            DeploymentResult::succeeded(Platform::Local, "up", Some("http://localhost:3000".into()))
        } else {
            DeploymentResult::failed(Platform::Local, "down")
        }),
    }
}

fn extension() -> impl Strategy<Value = Extension> {
    prop_oneof![
        (0usize..4).prop_map(Extension::Platform),
        (0usize..3).prop_map(Extension::Provider),
        any::<bool>().prop_map(Extension::Deployment),
    ]
}

proptest! {
    #[test]
    fn prop_steps_never_drop_fields(extensions in prop::collection::vec(extension(), 0..8)) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let observed: Arc<Mutex<Vec<(Vec<&'static str>, Vec<&'static str>)>>> =
            Arc::new(Mutex::new(Vec::new()));

        let steps: Vec<Box<dyn WizardStep>> = extensions
            .iter()
            .map(|ext| {
                let ext = *ext;
                let observed = observed.clone();
                Box::new(FnStep::new("extend", move |state: WizardState| {
                    let before = state.defined_fields();
                    let next = extend(state, ext);
                    observed.lock().unwrap().push((before, next.defined_fields()));
                    Ok(next)
                })) as Box<dyn WizardStep>
            })
            .collect();

        let final_state = runtime
            .block_on(Wizard::new(steps).run(WizardState::new(PathBuf::from("/out"))))
            .unwrap();

        prop_assert_eq!(final_state.output_dir(), Path::new("/out"));
        let observed = observed.lock().unwrap();
        prop_assert_eq!(observed.len(), extensions.len());
        for (before, after) in observed.iter() {
            for field in before {
                prop_assert!(after.contains(field), "{} was dropped", field);
            }
        }
    }
}
