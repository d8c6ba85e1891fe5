use crate::engine::compositing::preview_sync::PreviewBindings;
use crate::engine::compositing::texture_binding::bind_composite;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::session::controller::DesignSession;
use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task, block_on, futures_lite::future};
use std::sync::Arc;
use texture_compositor::{ComposeOutcome, Compositor, CompositorError, Ticket};

/// Compositor shared with the background tasks.
#[derive(Resource, Clone)]
pub struct PreviewCompositor(pub Arc<Compositor>);

struct ComposeTask {
    ticket: Ticket,
    task: Task<Result<ComposeOutcome, CompositorError>>,
}

#[derive(Resource, Default)]
pub struct ComposeTasks {
    tasks: Vec<ComposeTask>,
}

impl ComposeTasks {
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }
}

/// Start one compute per frame for a dirty session.
///
/// Edits made in the same frame coalesce into a single compute. Earlier
/// computes keep running but can no longer commit.
pub fn dispatch_compose(
    mut session: ResMut<DesignSession>,
    compositor: Option<Res<PreviewCompositor>>,
    mut tasks: ResMut<ComposeTasks>,
) {
    let Some(compositor) = compositor else {
        return;
    };
    // Read through `Deref` so idle frames do not flag the session as changed.
    if !session.is_dirty() {
        return;
    }
    session.take_dirty();

    let request = session.compose_request();
    let ticket = session.begin_compute();
    let task_ticket = ticket.clone();
    let compositor = Arc::clone(&compositor.0);

    debug!("Dispatching compose {}", ticket.generation());
    let task = AsyncComputeTaskPool::get()
        .spawn(async move { compositor.compose(&request, &task_ticket) });
    tasks.tasks.push(ComposeTask { ticket, task });
}

pub fn poll_compose_tasks(
    mut tasks: ResMut<ComposeTasks>,
    mut session: ResMut<DesignSession>,
    mut bindings: ResMut<PreviewBindings>,
    mut images: ResMut<Assets<Image>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let mut finished = Vec::new();
    tasks.tasks.retain_mut(|pending| {
        match block_on(future::poll_once(&mut pending.task)) {
            Some(result) => {
                finished.push((pending.ticket.clone(), result));
                false
            }
            None => true,
        }
    });

    for (ticket, result) in finished {
        apply_compose_result(
            &ticket,
            result,
            &mut session,
            &mut bindings,
            &mut images,
            &mut rpc_interface,
        );
    }
}

fn apply_compose_result(
    ticket: &Ticket,
    result: Result<ComposeOutcome, CompositorError>,
    session: &mut DesignSession,
    bindings: &mut PreviewBindings,
    images: &mut Assets<Image>,
    rpc_interface: &mut WebRpcInterface,
) {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => return report_compose_error(&e, rpc_interface),
    };

    for failure in &outcome.failures {
        warn!("{failure}");
    }
    let all_failed = outcome.all_failed();
    let failed_sides: Vec<&str> = outcome.failures.iter().map(|f| f.side.as_str()).collect();

    let texture = match session.commit(ticket, outcome.texture) {
        Ok(texture) => texture,
        Err(e) => return report_compose_error(&e, rpc_interface),
    };

    bind_composite(images, &mut bindings.composite, texture);
    rpc_interface.send_notification(
        "composite_updated",
        serde_json::json!({
            "generation": texture.generation(),
            "width": texture.width(),
            "height": texture.height(),
            "failed_sides": failed_sides,
        }),
    );

    if all_failed {
        rpc_interface.send_notification(
            "asset_warning",
            serde_json::json!({
                "message": "None of the uploaded images could be loaded",
                "sides": failed_sides,
            }),
        );
    }
}

/// The previous composite stays bound for every error kind.
fn report_compose_error(error: &CompositorError, rpc_interface: &mut WebRpcInterface) {
    match error {
        CompositorError::StaleComputeDiscarded { .. } => debug!("{error}"),
        CompositorError::Unavailable(reason) => {
            error!("{error}");
            rpc_interface.send_notification(
                "compositor_unavailable",
                serde_json::json!({
                    "message": "preview unavailable, you can still save",
                    "reason": reason,
                }),
            );
        }
        CompositorError::InvalidTemplateOverride(reason) => {
            warn!("{error}");
            rpc_interface.send_notification(
                "asset_warning",
                serde_json::json!({
                    "message": "The template image could not be read",
                    "reason": reason,
                }),
            );
        }
    }
}
