//! One photo turn: store, detect, synthesize, merge, report.
//!
//! Detection runs only against the items still to find, and a chapter-linear
//! game only looks for items of chapters it has reached. Synthesis always
//! runs and is cosmetic: when it fails the turn completes without an overlay
//! and any item found in the same turn stays cleared.

use hauntcam_core::blob::photo_path;
use hauntcam_core::command::Command;
use hauntcam_core::error::DomainError;
use hauntcam_core::model::{GamePatch, GameStatus, NewPhoto};
use hauntcam_game::domain::state_machine::{self, Completion};
use hauntcam_vision::application::item_detector::ItemDetector;
use hauntcam_vision::domain::detection::Candidate;
use hauntcam_vision::domain::gesture::GestureCue;
use tracing::{error, info, instrument};

use crate::application::{PlayServices, attach_overlay};
use crate::domain::commands::PlayTurn;
use crate::domain::messages::{TurnEvent, turn_message};
use crate::domain::outcome::TurnOutcome;

/// Handles the `PlayTurn` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown game,
/// `DomainError::InvalidState` for a solved game or one with nothing left to
/// find, `DomainError::Validation` for an empty upload, and the error of the
/// storage or detection step that failed.
#[instrument(skip_all, fields(game_id = %command.game_id))]
pub async fn handle_play_turn(
    command: &PlayTurn,
    services: &PlayServices<'_>,
) -> Result<TurnOutcome, DomainError> {
    let game = services.games.get(command.game_id).await?;
    state_machine::ensure_not_solved(&game)?;

    let catalog = services.scenario.catalog(game.mode);
    let remaining = catalog.remaining(&game.cleared_items);
    if remaining.is_empty() {
        return Err(DomainError::InvalidState(format!(
            "every item of game {} is already cleared",
            game.id
        )));
    }
    let reachable = services
        .scenario
        .reachable_items(game.mode, game.current_chapter);
    let searchable: Vec<&String> = remaining.intersection(&reachable).collect();
    if searchable.is_empty() {
        return Err(DomainError::InvalidState(format!(
            "chapter {} of game {} has nothing left to find; answer the chapter to continue",
            game.current_chapter, game.id
        )));
    }
    if command.photo.bytes.is_empty() {
        return Err(DomainError::Validation("uploaded photo is empty".to_owned()));
    }

    let sequence = services
        .games
        .next_photo_sequence(game.id, services.clock.now())
        .await?;
    let original_path = photo_path(game.id, sequence, "original", &command.photo.mime_type);
    let original = services
        .blobs
        .put(
            &original_path,
            command.photo.bytes.clone(),
            &command.photo.mime_type,
        )
        .await?;

    let candidates: Vec<Candidate> = searchable
        .into_iter()
        .map(|key| Candidate {
            key: key.clone(),
            label: services.scenario.label(key).to_owned(),
        })
        .collect();
    let detection = ItemDetector::new(services.generative, &services.models.detector)
        .detect(&command.photo, &candidates)
        .await?;
    let detected_item = detection.accepted_item().map(str::to_owned);

    let photo = services
        .photos
        .create(
            NewPhoto {
                game_id: game.id,
                sequence,
                chapter: game.current_chapter,
                original_path: original.path,
                original_url: original.public_url.clone(),
                detected_item: detected_item.clone(),
            },
            services.clock.now(),
        )
        .await?;

    let mut hint_message = match detected_item.as_deref() {
        Some(item) => services.scenario.hint_message(item).map(str::to_owned),
        None => Some(services.scenario.no_detection_message().to_owned()),
    };

    let gesture = GestureCue::for_detection(
        detected_item
            .as_deref()
            .map(|item| services.scenario.label(item)),
    );
    let overlay = match attach_overlay(
        services,
        &game,
        &photo,
        &command.photo,
        gesture,
        hint_message.as_deref(),
    )
    .await
    {
        Ok(photo) => photo.overlay,
        Err(e) => {
            error!(
                correlation_id = %command.correlation_id(),
                photo_id = %photo.id,
                error = %e,
                "ghost synthesis failed; continuing without overlay"
            );
            None
        }
    };

    let now = services.clock.now();
    let mut game = match detected_item.as_deref() {
        Some(item) => services.games.add_cleared_item(game.id, item, now).await?,
        None if game.status == GameStatus::Waiting => {
            let patch = GamePatch {
                status: Some(state_machine::progressed(game.status)),
                ..GamePatch::default()
            };
            services.games.update(game.id, &patch, now).await?
        }
        None => game,
    };

    let remaining_items = catalog.remaining(&game.cleared_items);
    let completion = state_machine::completion(
        game.mode,
        &catalog,
        &game.cleared_items,
        !services.scenario.has_next_chapter(game.current_chapter),
    );
    if completion == Completion::Solved && !game.is_solved() {
        let patch = GamePatch {
            status: Some(GameStatus::Solved),
            ..GamePatch::default()
        };
        game = services.games.update(game.id, &patch, now).await?;
    }
    let all_cleared = remaining_items.is_empty() || completion == Completion::Solved;

    let message = if all_cleared {
        if let Some(final_message) = services.scenario.all_cleared_message() {
            hint_message = Some(final_message.to_owned());
        }
        turn_message(TurnEvent::AllCleared {
            solved: game.is_solved(),
        })
    } else if let Some(item) = detected_item.as_deref() {
        turn_message(TurnEvent::Detected {
            label: services.scenario.label(item),
        })
    } else {
        let labels: Vec<&str> = remaining_items
            .iter()
            .map(|key| services.scenario.label(key))
            .collect();
        turn_message(TurnEvent::NothingFound { remaining: &labels })
    };

    info!(
        correlation_id = %command.correlation_id(),
        photo_id = %photo.id,
        sequence,
        detected_item = ?detected_item,
        overlay = overlay.is_some(),
        remaining = remaining_items.len(),
        status = game.status.as_str(),
        "turn processed"
    );

    Ok(TurnOutcome {
        game_id: game.id,
        photo_id: photo.id,
        original_url: original.public_url,
        detection,
        detected_item,
        overlay_url: overlay.as_ref().map(|o| o.url.clone()),
        overlay_message: overlay.and_then(|o| o.message),
        cleared_items: game.cleared_items.clone(),
        remaining_items,
        status: game.status,
        solved: game.is_solved(),
        ready_to_accuse: completion == Completion::ReadyToAccuse && !game.is_solved(),
        hint_message,
        message,
    })
}
