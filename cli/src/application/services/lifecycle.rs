//! Box lifecycle: create, start, stop, delete and the polling loops between them.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};

use crate::application::ports::{BoxApi, ProgressReporter};
use crate::application::services::poll::Poller;
use crate::domain::advisory::{AdvisoryContext, check_messages};
use crate::domain::lifecycle::{RunningStep, SETTLE_DELAY, TeardownStep, running_step, teardown_step};
use crate::domain::{
    ApiResponse, BoxId, BoxStatus, CreateSpec, JiffyBox, JiffyError, PollPolicy, ProtectedIds,
    Transition,
};

/// Drives boxes between stable states, refusing to touch protected ids.
pub struct LifecycleController<'a, A: BoxApi, P: ProgressReporter> {
    api: &'a A,
    protected: &'a ProtectedIds,
    policy: PollPolicy,
    reporter: &'a P,
}

impl<'a, A: BoxApi, P: ProgressReporter> LifecycleController<'a, A, P> {
    #[must_use]
    pub fn new(
        api: &'a A,
        protected: &'a ProtectedIds,
        policy: PollPolicy,
        reporter: &'a P,
    ) -> Self {
        Self {
            api,
            protected,
            policy,
            reporter,
        }
    }

    /// Submit a create request and return the box it registered.
    ///
    /// # Errors
    ///
    /// Fails on transport/API errors, on any advisory other than the network
    /// configuration notice, and when the reply carries no box.
    pub async fn create(&self, spec: &CreateSpec) -> Result<JiffyBox> {
        self.reporter
            .step(&format!("creating JiffyBox '{}'...", spec.name));
        let reply = self
            .api
            .create_box(spec)
            .await
            .with_context(|| format!("creating JiffyBox '{}'", spec.name))?;
        for note in check_messages(AdvisoryContext::Create, &reply.messages)? {
            tracing::info!(note = %note, "create advisory");
        }
        let created = reply.into_box()?;
        tracing::info!(id = %created.id, name = %created.name, "box created");
        Ok(created)
    }

    /// Create a box and wait until it is `READY` and running.
    ///
    /// # Errors
    ///
    /// See [`Self::create`] and [`Self::await_running`].
    pub async fn create_and_await_running(&self, spec: &CreateSpec) -> Result<JiffyBox> {
        let created = self.create(spec).await?;
        self.await_running(created.id).await
    }

    /// Poll box `id` until it is `READY` and running, starting it once if needed.
    ///
    /// # Errors
    ///
    /// Fails with `UnknownStatus` for unhandled statuses, `Timeout` when the
    /// polling budget runs out, and on any API failure.
    pub async fn await_running(&self, id: BoxId) -> Result<JiffyBox> {
        let mut poller = Poller::new(id, self.policy);
        let mut start_issued = false;
        poller.wait(SETTLE_DELAY).await;
        loop {
            poller.begin_poll()?;
            let snapshot = self.fetch(id).await?;
            let (status, running) = observed(snapshot.as_ref());
            tracing::debug!(%id, %status, running, poll = poller.polls(), "await running");
            match running_step(id, &status, running, start_issued)? {
                RunningStep::Done => {
                    let ready = snapshot.ok_or_else(|| {
                        JiffyError::UnexpectedResponse(format!("JiffyBox {id} vanished"))
                    })?;
                    self.reporter.success(&format!("JiffyBox {id} is running"));
                    return Ok(ready);
                }
                RunningStep::Start => {
                    self.reporter.step(&format!("JiffyBox {id} is ready, starting it..."));
                    self.send_transition(id, Transition::Start).await?;
                    start_issued = true;
                }
                RunningStep::Wait(delay) => {
                    self.reporter.step(&format!(
                        "JiffyBox {id} is {status}, checking again in {}s",
                        delay.as_secs()
                    ));
                    poller.wait(delay).await;
                }
            }
        }
    }

    /// Stop box `id` and poll until its deletion has been accepted.
    ///
    /// `mode` is `Transition::Shutdown` or `Transition::Pullplug`.
    ///
    /// # Errors
    ///
    /// Fails with `ProtectedResource` (before any API call) for protected ids,
    /// with `UnknownStatus`/`Timeout` from the loop, and on any API failure.
    pub async fn stop_and_await_deleted(&self, id: BoxId, mode: Transition) -> Result<()> {
        self.protected.guard(id)?;
        self.reporter.step(&format!("stopping JiffyBox {id} ({mode})..."));
        self.send_transition(id, mode).await?;

        let mut poller = Poller::new(id, self.policy);
        let mut delete_issued = false;
        poller.wait(SETTLE_DELAY).await;
        loop {
            poller.begin_poll()?;
            let snapshot = self.fetch(id).await?;
            let (status, running) = observed(snapshot.as_ref());
            tracing::debug!(%id, %status, running, poll = poller.polls(), "await deletion");
            match teardown_step(id, &status, running, delete_issued)? {
                TeardownStep::Done => {
                    self.reporter
                        .success(&format!("JiffyBox {id} is being deleted"));
                    return Ok(());
                }
                TeardownStep::Delete => {
                    self.reporter.step(&format!("JiffyBox {id} stopped, deleting it..."));
                    self.delete_box(id).await?;
                    delete_issued = true;
                }
                TeardownStep::Wait(delay) => {
                    self.reporter.step(&format!(
                        "JiffyBox {id} is {status}, checking again in {}s",
                        delay.as_secs()
                    ));
                    poller.wait(delay).await;
                }
            }
        }
    }

    /// Apply a single transition and return the box as reported afterwards.
    ///
    /// # Errors
    ///
    /// Fails with `ProtectedResource` (before any API call) for protected ids,
    /// on fatal advisories and when the reply carries no box.
    pub async fn transition(&self, id: BoxId, action: Transition) -> Result<JiffyBox> {
        let reply = self.send_transition(id, action).await?;
        Ok(reply.into_box()?)
    }

    /// Delete box `id`.
    ///
    /// # Errors
    ///
    /// Fails with `ProtectedResource` (before any API call) for protected ids,
    /// on fatal advisories and when the API rejects the deletion.
    pub async fn delete_box(&self, id: BoxId) -> Result<()> {
        self.protected.guard(id)?;
        let reply = self
            .api
            .delete_box(id)
            .await
            .with_context(|| format!("deleting JiffyBox {id}"))?;
        check_messages(AdvisoryContext::Delete, &reply.messages)?;
        if reply.is_rejected() {
            return Err(JiffyError::UnexpectedResponse(format!(
                "deletion of JiffyBox {id} was not accepted"
            ))
            .into());
        }
        tracing::info!(%id, "delete requested");
        Ok(())
    }

    async fn send_transition(&self, id: BoxId, action: Transition) -> Result<ApiResponse> {
        self.protected.guard(id)?;
        let reply = self
            .api
            .transition_box(id, action)
            .await
            .with_context(|| format!("sending {action} to JiffyBox {id}"))?;
        let context = match action {
            Transition::Shutdown | Transition::Pullplug => AdvisoryContext::Stop,
            Transition::Start | Transition::Freeze | Transition::Thaw => {
                AdvisoryContext::Transition
            }
        };
        for note in check_messages(context, &reply.messages)? {
            self.reporter.warn(&note);
        }
        tracing::info!(%id, %action, "transition sent");
        Ok(reply)
    }

    async fn fetch(&self, id: BoxId) -> Result<Option<JiffyBox>> {
        let reply = self
            .api
            .get_box(id)
            .await
            .with_context(|| format!("reading JiffyBox {id}"))?;
        Ok(reply.into_box_if_present()?)
    }
}

fn observed(snapshot: Option<&JiffyBox>) -> (BoxStatus, bool) {
    snapshot.map_or((BoxStatus::Deleted, false), |b| (b.status.clone(), b.running))
}
