use actix::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::application::{AssignOrderHandler, MoveCouriersHandler};
use crate::errors::{DeliveryError, ErrorKind};

// ============================================================================
// Job Scheduler Actor - drives the two periodic triggers
// ============================================================================
//
// - assign: dispatch the oldest Created order to a courier
// - move:   advance every assigned courier one step, completing on arrival
//
// Each tick spawns the job on the actor's arbiter. A job still running from
// the previous tick makes the new tick a no-op, so cycles never overlap.
// Failures are logged and never stop the schedule; "nothing to do" is only
// worth a debug line. The two jobs may interleave; storage row versions make
// the loser of a race fail with Conflict and try again on its next tick.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Assign,
    Move,
}

impl Job {
    fn name(self) -> &'static str {
        match self {
            Job::Assign => "assign_order",
            Job::Move => "move_couriers",
        }
    }
}

#[derive(Clone)]
struct JobRunner {
    assign: Arc<AssignOrderHandler>,
    mover: Arc<MoveCouriersHandler>,
    assign_running: Arc<AtomicBool>,
    move_running: Arc<AtomicBool>,
}

impl JobRunner {
    /// Ok(false) when the previous run of the same job is still in progress.
    async fn run(&self, job: Job) -> Result<bool, DeliveryError> {
        let running = match job {
            Job::Assign => &self.assign_running,
            Job::Move => &self.move_running,
        };
        if running.swap(true, Ordering::SeqCst) {
            tracing::debug!(job = job.name(), "Previous run still in progress, skipping tick");
            return Ok(false);
        }

        let result = match job {
            Job::Assign => self.assign.handle().await.map(|_| ()),
            Job::Move => self.mover.handle().await.map(|_| ()),
        };
        running.store(false, Ordering::SeqCst);

        result.map(|()| true)
    }

    async fn run_logged(&self, job: Job) {
        match self.run(job).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(job = job.name(), reason = %e, "Nothing to do");
            }
            Err(e) if e.kind() == ErrorKind::Conflict => {
                tracing::info!(job = job.name(), reason = %e, "Lost a concurrent update, retrying next tick");
            }
            Err(e) => {
                tracing::warn!(job = job.name(), error = %e, "Scheduled job failed");
            }
        }
    }
}

pub struct JobScheduler {
    runner: JobRunner,
    assign_interval: Duration,
    move_interval: Duration,
}

impl JobScheduler {
    pub fn new(
        assign: Arc<AssignOrderHandler>,
        mover: Arc<MoveCouriersHandler>,
        assign_interval: Duration,
        move_interval: Duration,
    ) -> Self {
        Self {
            runner: JobRunner {
                assign,
                mover,
                assign_running: Arc::new(AtomicBool::new(false)),
                move_running: Arc::new(AtomicBool::new(false)),
            },
            assign_interval,
            move_interval,
        }
    }

    fn schedule(&self, ctx: &mut Context<Self>, job: Job, every: Duration) {
        ctx.run_interval(every, move |act, _ctx| {
            let runner = act.runner.clone();
            actix::spawn(async move {
                runner.run_logged(job).await;
            });
        });
    }
}

impl Actor for JobScheduler {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!(
            assign_interval_ms = self.assign_interval.as_millis() as u64,
            move_interval_ms = self.move_interval.as_millis() as u64,
            "⏱️ JobScheduler started"
        );

        self.schedule(ctx, Job::Assign, self.assign_interval);
        self.schedule(ctx, Job::Move, self.move_interval);
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        tracing::info!("🛑 JobScheduler stopping");
        Running::Stop
    }

    fn stopped(&mut self, _: &mut Self::Context) {
        tracing::info!("🛑 JobScheduler stopped");
    }
}

// ============================================================================
// Messages
// ============================================================================

/// Run one job now, outside the schedule. Ok(false) if it was already running.
#[derive(Message)]
#[rtype(result = "Result<bool, String>")]
pub struct RunJob(pub Job);

impl Handler<RunJob> for JobScheduler {
    type Result = ResponseFuture<Result<bool, String>>;

    fn handle(&mut self, msg: RunJob, _ctx: &mut Self::Context) -> Self::Result {
        let runner = self.runner.clone();
        Box::pin(async move { runner.run(msg.0).await.map_err(|e| e.to_string()) })
    }
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;

impl Handler<Shutdown> for JobScheduler {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Self::Context) -> Self::Result {
        tracing::info!("Received shutdown signal");
        ctx.stop();
    }
}
