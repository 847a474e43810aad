//! Wizard controller: step sequence, traversal, forced ordering and navigation
//!
//! A [`Wizard`] lives for exactly one request. It never caches the step
//! sequence: every call to [`Wizard::steps`] rebuilds the steps from the
//! registry so availability and completion always reflect the current
//! content. Only the current step instance is kept, because it carries the
//! status of the commit performed during this request.

pub mod sequence;
pub mod types;

use crate::error::WizardError;
use crate::form::Content;
use crate::registry::WizardDefinition;
use crate::step::{Step, StepContext};
use crate::url;

pub use types::*;


/// One wizard bound to one request
pub struct Wizard<'a> {
    definition: &'a WizardDefinition,
    content: &'a mut dyn Content,
    request: &'a WizardRequest,
    context_url: String,
    /// Currently selected step
    step: Option<Step>,
    /// Redirect target; when set the request ends in a redirect
    next_url: Option<String>,
}

impl<'a> Wizard<'a> {
    pub fn new(
        definition: &'a WizardDefinition,
        content: &'a mut dyn Content,
        request: &'a WizardRequest,
    ) -> Self {
        let context_url = definition.url_resolver().absolute_url(&*content, request);
        Self {
            definition,
            content,
            request,
            context_url,
            step: None,
            next_url: None,
        }
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    /// URL of the content object
    pub fn context_url(&self) -> &str {
        &self.context_url
    }

    /// URL of the wizard itself
    pub fn base_url(&self) -> String {
        url::join(&self.context_url, self.name())
    }

    pub fn step_url(&self, step_name: &str) -> String {
        url::join(&self.base_url(), step_name)
    }

    pub fn content(&self) -> &dyn Content {
        &*self.content
    }

    pub fn step(&self) -> Option<&Step> {
        self.step.as_ref()
    }

    pub fn next_url(&self) -> Option<&str> {
        self.next_url.as_deref()
    }

    /// Available steps in weight order, rebuilt on every call
    pub fn steps(&self) -> Vec<Step> {
        sequence::sequence(
            self.definition
                .steps()
                .discover(&*self.content, self.request, self.definition),
        )
    }

    fn step_names(&self) -> Vec<String> {
        self.steps()
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    /// Every step in the sequence is completed
    pub fn completed(&self) -> bool {
        self.steps().iter().all(|s| s.completed(&*self.content))
    }

    fn current_name(&self) -> Option<&str> {
        self.step.as_ref().map(Step::name)
    }

    pub fn is_first_step(&self) -> bool {
        match self.current_name() {
            Some(current) => self.steps().first().is_some_and(|s| s.name() == current),
            None => false,
        }
    }

    pub fn is_last_step(&self) -> bool {
        match self.current_name() {
            Some(current) => self.steps().last().is_some_and(|s| s.name() == current),
            None => false,
        }
    }

    pub fn show_back_button(&self) -> bool {
        self.step.is_some() && !self.is_first_step()
    }

    pub fn show_next_button(&self) -> bool {
        self.step.is_some() && !self.is_last_step()
    }

    pub fn show_complete_button(&self) -> bool {
        self.is_last_step() && self.completed()
    }

    /// Actions whose button condition currently holds
    pub fn available_actions(&self) -> Vec<WizardAction> {
        let mut actions = Vec::new();
        if self.show_back_button() {
            actions.push(WizardAction::Back);
        }
        if self
            .step
            .as_ref()
            .is_some_and(|s| s.settings().apply_button)
        {
            actions.push(WizardAction::Apply);
        }
        if self.show_next_button() {
            actions.push(WizardAction::Next);
        }
        if self.show_complete_button() {
            actions.push(WizardAction::Complete);
        }
        actions
    }

    /// Position of the current step in the sequence
    fn current_index(&self) -> Result<(usize, Vec<String>), WizardError> {
        let current = self.current_name().ok_or(WizardError::NoCurrentStep)?;
        let names = self.step_names();
        let idx = names
            .iter()
            .position(|n| n == current)
            .ok_or_else(|| WizardError::StepNotInSequence(current.to_string()))?;
        Ok((idx, names))
    }

    pub fn previous_step_name(&self) -> Result<Option<String>, WizardError> {
        let (idx, names) = self.current_index()?;
        if idx == 0 {
            return Ok(None);
        }
        Ok(Some(names[idx - 1].clone()))
    }

    pub fn next_step_name(&self) -> Result<Option<String>, WizardError> {
        let (idx, mut names) = self.current_index()?;
        if idx + 1 >= names.len() {
            return Ok(None);
        }
        Ok(Some(names.swap_remove(idx + 1)))
    }

    /// Menu entries for visible steps
    pub fn step_menu(&self) -> Vec<MenuItem> {
        let steps = self.steps();
        let last = steps.len().saturating_sub(1);
        let settings = self.definition.settings();
        let current = self.current_name();

        steps
            .iter()
            .enumerate()
            .filter(|(_, step)| step.is_visible())
            .map(|(idx, step)| {
                let selected = current == Some(step.name());
                MenuItem {
                    name: step.name().to_string(),
                    title: step.label().to_string(),
                    number: idx + 1,
                    url: self.step_url(step.name()),
                    selected,
                    class: if selected {
                        Some(settings.css_active.clone())
                    } else {
                        settings.css_inactive.clone()
                    },
                    first: idx == 0,
                    last: idx == last,
                }
            })
            .collect()
    }

    /// Step used when the request names none
    pub fn default_step(&self) -> Result<Step, WizardError> {
        let mut steps = self.steps();
        if steps.is_empty() {
            return Err(WizardError::NoSteps(self.name().to_string()));
        }
        let idx = if self.definition.settings().first_step_as_default {
            0
        } else {
            // first incomplete step, or the first step once everything is done
            steps
                .iter()
                .position(|s| !s.completed(&*self.content))
                .unwrap_or(0)
        };
        Ok(steps.swap_remove(idx))
    }

    /// Name of the step to show when the wizard itself is addressed
    pub fn browser_default(&self) -> Result<String, WizardError> {
        match self.step {
            Some(ref step) => Ok(step.name().to_string()),
            None => self.default_step().map(|s| s.name().to_string()),
        }
    }

    /// Resolve a path segment to a step and make it current
    pub fn traverse(&mut self, segment: &str) -> Result<&Step, WizardError> {
        let raw_name = segment.split_once('.').map_or(segment, |(name, _)| name);
        let step = self
            .steps()
            .into_iter()
            .find(|s| s.name() == raw_name)
            .ok_or_else(|| WizardError::NotFound(segment.to_string()))?;

        tracing::debug!(wizard = %self.name(), step = %step.name(), "traversed to step");
        let step = self.step.insert(step);
        Ok(&*step)
    }

    /// Forced ordering: redirect to the first incomplete step before the
    /// current one. Returns true when a redirect was prepared.
    pub fn adjust_step(&mut self) -> Result<bool, WizardError> {
        if !self.definition.settings().adjust_step {
            return Ok(false);
        }
        let current = self
            .current_name()
            .ok_or(WizardError::NoCurrentStep)?
            .to_string();

        for step in self.steps() {
            if step.name() == current {
                break;
            }
            if !step.completed(&*self.content) {
                tracing::info!(
                    wizard = %self.name(),
                    requested = %current,
                    incomplete = %step.name(),
                    "redirecting to incomplete step"
                );
                self.next_url = Some(self.step_url(step.name()));
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn go_to_step(&mut self, step_name: &str) {
        self.next_url = Some(self.step_url(step_name));
    }

    pub fn go_to_back(&mut self) -> Result<(), WizardError> {
        if let Some(name) = self.previous_step_name()? {
            self.go_to_step(&name);
        }
        Ok(())
    }

    pub fn go_to_next(&mut self) -> Result<(), WizardError> {
        if let Some(name) = self.next_step_name()? {
            self.go_to_step(&name);
        }
        Ok(())
    }

    /// Run a commit-style handler on the current step with the request data
    fn with_current_step<F>(&mut self, handler: F) -> Result<bool, WizardError>
    where
        F: FnOnce(&mut Step, &mut StepContext<'_>) -> bool,
    {
        let step = self.step.as_mut().ok_or(WizardError::NoCurrentStep)?;
        let mut cx = StepContext {
            content: &mut *self.content,
            submission: &self.request.data,
            notifier: self.definition.notifier(),
            content_url: &self.context_url,
        };
        Ok(handler(step, &mut cx))
    }

    pub fn do_back(&mut self) -> Result<(), WizardError> {
        if self.with_current_step(Step::do_back)? {
            self.go_to_back()?;
        }
        Ok(())
    }

    pub fn do_next(&mut self) -> Result<(), WizardError> {
        if self.with_current_step(Step::do_next)? {
            self.go_to_next()?;
        }
        Ok(())
    }

    pub fn do_complete(&mut self) -> Result<(), WizardError> {
        if self.with_current_step(Step::do_complete)? {
            self.do_finish();
        }
        Ok(())
    }

    /// Edit-step commit without navigation
    pub fn do_apply(&mut self) -> Result<(), WizardError> {
        self.with_current_step(Step::do_handle_apply)?;
        Ok(())
    }

    /// Finish hook; redirects to the confirmation page when one is configured
    pub fn do_finish(&mut self) {
        self.definition.hooks().on_finish(&mut *self.content);
        tracing::info!(wizard = %self.name(), content = %self.context_url, "wizard completed");

        if let Some(ref page) = self.definition.settings().confirmation_page_name {
            self.next_url = Some(url::join(&self.context_url, page));
        }
    }

    /// Guard, then execute the requested action if its button is offered
    pub fn update(&mut self) -> Result<(), WizardError> {
        if self.adjust_step()? {
            return Ok(());
        }
        let Some(action) = self.request.action else {
            return Ok(());
        };
        if !self.available_actions().contains(&action) {
            tracing::debug!(wizard = %self.name(), %action, "action not offered, ignoring");
            return Ok(());
        }

        tracing::debug!(wizard = %self.name(), %action, "executing action");
        match action {
            WizardAction::Back => self.do_back(),
            WizardAction::Next => self.do_next(),
            WizardAction::Complete => self.do_complete(),
            WizardAction::Apply => self.do_apply(),
        }
    }

    /// Projection of the current step for rendering
    pub fn view(&self) -> Result<StepView, WizardError> {
        let step = self.step.as_ref().ok_or(WizardError::NoCurrentStep)?;
        Ok(StepView {
            wizard: self.name().to_string(),
            step: step.name().to_string(),
            label: step.label().to_string(),
            status: step.status(),
            status_message: step.status().map(|s| s.message().to_string()),
            errors: step.errors().to_vec(),
            values: step.fields().values(&*self.content),
            menu: self.step_menu(),
            actions: self.available_actions(),
            step_completed: step.completed(&*self.content),
            wizard_completed: self.completed(),
        })
    }

    /// Full request cycle: resolve, guard, act, then redirect or render
    pub fn process(mut self) -> Result<Outcome, WizardError> {
        let request = self.request;
        let Some(segment) = request.step.as_deref() else {
            let name = self.browser_default()?;
            return Ok(Outcome::Redirect(self.step_url(&name)));
        };

        self.traverse(segment)?;
        self.update()?;

        if let Some(url) = self.next_url.take() {
            return Ok(Outcome::Redirect(url));
        }
        self.view().map(Outcome::Render)
    }
}
