//! Media editor: list, store and delete resources of the selected source.

use crate::engine::{next_action, Context};
use crate::media::MediaQuery;
use geostory_common::Value;
use geostory_editor::{Action, MediaType};
use tokio::sync::broadcast;

const PAGE_SIZE: usize = 10;

pub(crate) async fn run(ctx: Context, mut actions: broadcast::Receiver<Action>) {
    while let Some(action) = next_action(&mut actions).await {
        match action {
            Action::ShowMediaEditor { .. } | Action::SetMediaType { .. } => load(&ctx, None).await,
            Action::LoadMedia { media_type } => load(&ctx, media_type).await,
            Action::SaveMediaSuccess { media_type, .. } => load(&ctx, Some(media_type)).await,
            Action::SaveMedia { media_type, data } => save(&ctx, media_type, data).await,
            Action::RemoveMedia { media_type, id } => remove(&ctx, media_type, &id).await,
            _ => {}
        }
    }
}

async fn load(ctx: &Context, media_type: Option<MediaType>) {
    let (source_id, selected_type) = ctx.read(|state| (state.media.source_id.clone(), state.media.media_type));
    let media_type = media_type.unwrap_or(selected_type);
    let query = MediaQuery {
        media_type,
        page: 1,
        page_size: PAGE_SIZE,
    };

    let page = match ctx.services.media.get(&source_id) {
        Ok(service) => service.load(ctx, query).await,
        Err(err) => Err(err),
    };
    match page {
        Ok(page) => ctx.emit(Action::LoadMediaSuccess {
            media_type,
            source_id,
            resources: page.resources,
            total_count: page.total_count,
        }),
        Err(err) => tracing::warn!(source = %source_id, error = %err, "loading media failed"),
    }
}

async fn save(ctx: &Context, media_type: MediaType, data: Value) {
    let (source_id, editing, selected) = ctx.read(|state| {
        (
            state.media.source_id.clone(),
            state.media.editing,
            state.media.selected.clone(),
        )
    });
    let service = match ctx.services.media.get(&source_id) {
        Ok(service) => service,
        Err(err) => {
            tracing::warn!(error = %err, "saving media failed");
            return;
        }
    };

    let saved = match selected.filter(|_| editing) {
        Some(id) => service.edit(ctx, media_type, &id, data).await,
        None => service.save(ctx, media_type, data).await,
    };
    match saved {
        Ok(id) => {
            tracing::info!(source = %source_id, id = %id, "media saved");
            ctx.emit(Action::SaveMediaSuccess {
                media_type,
                source_id,
                id: id.clone(),
            });
            ctx.emit(Action::EditingMedia { editing: false });
            ctx.emit(Action::SelectItem { id });
        }
        Err(err) => tracing::warn!(source = %source_id, error = %err, "saving media failed"),
    }
}

async fn remove(ctx: &Context, media_type: MediaType, id: &str) {
    let source_id = ctx.read(|state| state.media.source_id.clone());
    let removed = match ctx.services.media.get(&source_id) {
        Ok(service) => service.remove(ctx, media_type, id).await,
        Err(err) => Err(err),
    };
    match removed {
        Ok(_) => ctx.emit(Action::LoadMedia {
            media_type: Some(media_type),
        }),
        Err(err) => tracing::warn!(source = %source_id, id, error = %err, "removing media failed"),
    }
}
