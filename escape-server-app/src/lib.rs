use std::sync::Arc;

use crate::{
    ports::{recommendation::RecommendationPort, store::Store},
    workflow::{
        game::{
            create::{CreateGameUseCase, CreateGameUseCaseImpl},
            delete::{DeleteGameUseCase, DeleteGameUseCaseImpl},
            list::{ListGamesUseCase, ListGamesUseCaseImpl},
            update::{UpdateGameUseCase, UpdateGameUseCaseImpl},
        },
        notify::NotifyRecommendationWorkflowImpl,
        recommendation::{
            get::{GetRecommendationsUseCase, GetRecommendationsUseCaseImpl},
            sync::{SyncRecommendationsUseCase, SyncRecommendationsUseCaseImpl},
        },
        review::{
            delete::{DeleteReviewUseCase, DeleteReviewUseCaseImpl},
            list::{ListRoomReviewsUseCase, ListRoomReviewsUseCaseImpl},
            submit::{SubmitReviewUseCase, SubmitReviewUseCaseImpl},
            update::{UpdateReviewUseCase, UpdateReviewUseCaseImpl},
        },
        room::{
            get::{GetRoomUseCase, GetRoomUseCaseImpl},
            list::{ListRoomsUseCase, ListRoomsUseCaseImpl},
            reconcile::{ReconcileRoomsUseCase, ReconcileRoomsUseCaseImpl},
            search_fields::{SearchFieldsUseCase, SearchFieldsUseCaseImpl},
        },
        user::{
            get::{GetUserUseCase, GetUserUseCaseImpl},
            register::{RegisterUserUseCase, RegisterUserUseCaseImpl},
            search::{SearchUsersUseCase, SearchUsersUseCaseImpl},
            update::{UpdateProfileUseCase, UpdateProfileUseCaseImpl},
        },
    },
};

pub mod domain;
pub mod ports;
pub mod workflow;

pub struct Application {
    pub game_create_use_case: Box<dyn CreateGameUseCase + Send + Sync + 'static>,
    pub game_update_use_case: Box<dyn UpdateGameUseCase + Send + Sync + 'static>,
    pub game_delete_use_case: Box<dyn DeleteGameUseCase + Send + Sync + 'static>,
    pub game_list_use_case: Box<dyn ListGamesUseCase + Send + Sync + 'static>,

    pub review_submit_use_case: Box<dyn SubmitReviewUseCase + Send + Sync + 'static>,
    pub review_update_use_case: Box<dyn UpdateReviewUseCase + Send + Sync + 'static>,
    pub review_delete_use_case: Box<dyn DeleteReviewUseCase + Send + Sync + 'static>,
    pub review_list_use_case: Box<dyn ListRoomReviewsUseCase + Send + Sync + 'static>,

    pub room_get_use_case: Box<dyn GetRoomUseCase + Send + Sync + 'static>,
    pub room_list_use_case: Box<dyn ListRoomsUseCase + Send + Sync + 'static>,
    pub room_reconcile_use_case: Box<dyn ReconcileRoomsUseCase + Send + Sync + 'static>,
    pub room_search_fields_use_case: Box<dyn SearchFieldsUseCase + Send + Sync + 'static>,

    pub user_register_use_case: Box<dyn RegisterUserUseCase + Send + Sync + 'static>,
    pub user_get_use_case: Box<dyn GetUserUseCase + Send + Sync + 'static>,
    pub user_search_use_case: Box<dyn SearchUsersUseCase + Send + Sync + 'static>,
    pub user_update_use_case: Box<dyn UpdateProfileUseCase + Send + Sync + 'static>,

    pub recommendation_get_use_case: Box<dyn GetRecommendationsUseCase + Send + Sync + 'static>,
    pub recommendation_sync_use_case: Box<dyn SyncRecommendationsUseCase + Send + Sync + 'static>,
}

pub fn build_application<
    S: Store + Send + Sync + 'static,
    R: RecommendationPort + Send + Sync + 'static,
>(
    store: Arc<S>,
    recommendation_port: Arc<R>,
) -> Application {
    let notify_workflow = Arc::new(NotifyRecommendationWorkflowImpl::new(
        recommendation_port.clone(),
    ));

    Application {
        game_create_use_case: Box::new(CreateGameUseCaseImpl::new(
            store.clone(),
            notify_workflow.clone(),
        )),
        game_update_use_case: Box::new(UpdateGameUseCaseImpl::new(store.clone())),
        game_delete_use_case: Box::new(DeleteGameUseCaseImpl::new(
            store.clone(),
            notify_workflow.clone(),
        )),
        game_list_use_case: Box::new(ListGamesUseCaseImpl::new(store.clone())),
        review_submit_use_case: Box::new(SubmitReviewUseCaseImpl::new(
            store.clone(),
            notify_workflow.clone(),
        )),
        review_update_use_case: Box::new(UpdateReviewUseCaseImpl::new(
            store.clone(),
            notify_workflow.clone(),
        )),
        review_delete_use_case: Box::new(DeleteReviewUseCaseImpl::new(
            store.clone(),
            notify_workflow.clone(),
        )),
        review_list_use_case: Box::new(ListRoomReviewsUseCaseImpl::new(store.clone())),
        room_get_use_case: Box::new(GetRoomUseCaseImpl::new(
            store.clone(),
            notify_workflow.clone(),
        )),
        room_list_use_case: Box::new(ListRoomsUseCaseImpl::new(store.clone())),
        room_reconcile_use_case: Box::new(ReconcileRoomsUseCaseImpl::new(
            store.clone(),
            notify_workflow.clone(),
        )),
        room_search_fields_use_case: Box::new(SearchFieldsUseCaseImpl::new(store.clone())),
        user_register_use_case: Box::new(RegisterUserUseCaseImpl::new(
            store.clone(),
            notify_workflow.clone(),
        )),
        user_get_use_case: Box::new(GetUserUseCaseImpl::new(store.clone())),
        user_search_use_case: Box::new(SearchUsersUseCaseImpl::new(store.clone())),
        user_update_use_case: Box::new(UpdateProfileUseCaseImpl::new(store.clone())),
        recommendation_get_use_case: Box::new(GetRecommendationsUseCaseImpl::new(
            store.clone(),
            recommendation_port.clone(),
        )),
        recommendation_sync_use_case: Box::new(SyncRecommendationsUseCaseImpl::new(
            store.clone(),
            recommendation_port.clone(),
        )),
    }
}
