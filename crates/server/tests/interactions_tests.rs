//! Bookmark and comment coverage, including idempotent bookmarking and
//! author resolution for comments.

mod common;

use common::{test_app, TestApp, UserFixture};
use error::AppError;
use server::{
    catalog::{categories, recipes},
    dto::{
        catalog::{CategoryRequest, ListQuery, RecipeRequest},
        interactions::{CommentListQuery, CreateBookmarkRequest, CreateCommentRequest},
    },
    interactions::{bookmarks, comments},
};

async fn seed_recipe(app: &TestApp, name: &str) -> entity::recipes::Model {
    let category = categories::create(
        &app.state,
        CategoryRequest {
            name:      format!("{name} category"),
            image_url: None,
        },
    )
    .await
    .unwrap();

    recipes::create(
        &app.state,
        RecipeRequest {
            name:                name.to_string(),
            description:         "Test dish".to_string(),
            cooking_description: "Cook it".to_string(),
            image_url:           None,
            category_id:         category.id,
            ingredients:         vec!["salt".to_string()],
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_bookmark_add_is_idempotent() {
    let app = test_app().await;
    let recipe = seed_recipe(&app, "Borscht").await;
    let (_, identity) = UserFixture::new().create(&app).await;

    let first = bookmarks::add(&app.state, &identity, CreateBookmarkRequest { recipe_id: recipe.id })
        .await
        .unwrap();
    let second = bookmarks::add(&app.state, &identity, CreateBookmarkRequest { recipe_id: recipe.id })
        .await
        .unwrap();
    assert_eq!(first.id, second.id, "re-bookmarking returns the existing row");

    let (items, meta) = bookmarks::list(&app.state, &identity, ListQuery::default()).await.unwrap();
    assert_eq!(meta.total_items, 1);
    assert_eq!(items[0].recipe.id, recipe.id);
}

#[tokio::test]
async fn test_bookmark_unknown_recipe_is_not_found() {
    let app = test_app().await;
    let (_, identity) = UserFixture::new().create(&app).await;

    let err = bookmarks::add(&app.state, &identity, CreateBookmarkRequest { recipe_id: 9999 })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn test_bookmark_remove_is_idempotent_and_scoped() {
    let app = test_app().await;
    let recipe = seed_recipe(&app, "Borscht").await;
    let (_, alice) = UserFixture::new()
        .with_username("alice")
        .with_email("alice@example.com")
        .create(&app)
        .await;
    let (_, bob) = UserFixture::new()
        .with_username("bobby")
        .with_email("bob@example.com")
        .create(&app)
        .await;

    bookmarks::add(&app.state, &alice, CreateBookmarkRequest { recipe_id: recipe.id })
        .await
        .unwrap();

    // Bob removing a bookmark he never made must not touch Alice's.
    bookmarks::remove(&app.state, &bob, recipe.id).await.unwrap();
    let (items, _) = bookmarks::list(&app.state, &alice, ListQuery::default()).await.unwrap();
    assert_eq!(items.len(), 1);

    bookmarks::remove(&app.state, &alice, recipe.id).await.unwrap();
    let (items, _) = bookmarks::list(&app.state, &alice, ListQuery::default()).await.unwrap();
    assert!(items.is_empty());

    // Removing again still succeeds.
    bookmarks::remove(&app.state, &alice, recipe.id).await.unwrap();
}

#[tokio::test]
async fn test_comments_are_newest_first_with_authors() {
    let app = test_app().await;
    let recipe = seed_recipe(&app, "Borscht").await;
    let (_, identity) = UserFixture::new().create(&app).await;

    for i in 0 .. 3 {
        comments::create(
            &app.state,
            &identity,
            CreateCommentRequest {
                recipe_id: recipe.id,
                text:      format!("comment {i}"),
            },
        )
        .await
        .unwrap();
        // Distinct timestamps for a stable order.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let (items, meta) = comments::list(
        &app.state,
        CommentListQuery {
            recipe_id: recipe.id,
            page:      None,
            per_page:  None,
        },
    )
    .await
    .unwrap();

    assert_eq!(meta.total_items, 3);
    assert_eq!(items[0].text, "comment 2");
    assert_eq!(items[2].text, "comment 0");
    assert!(items.iter().all(|c| c.author.as_deref() == Some("testuser")));
}

#[tokio::test]
async fn test_comment_author_survives_account_deletion_as_none() {
    let app = test_app().await;
    let recipe = seed_recipe(&app, "Borscht").await;
    let (user, identity) = UserFixture::new().create(&app).await;

    comments::create(
        &app.state,
        &identity,
        CreateCommentRequest {
            recipe_id: recipe.id,
            text:      "lovely".to_string(),
        },
    )
    .await
    .unwrap();

    use sea_orm::EntityTrait;
    entity::users::Entity::delete_by_id(user.id)
        .exec(&app.state.db)
        .await
        .unwrap();

    let (items, _) = comments::list(
        &app.state,
        CommentListQuery {
            recipe_id: recipe.id,
            page:      None,
            per_page:  None,
        },
    )
    .await
    .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].author, None);
}

#[tokio::test]
async fn test_comment_on_unknown_recipe_is_not_found() {
    let app = test_app().await;
    let (_, identity) = UserFixture::new().create(&app).await;

    let err = comments::create(
        &app.state,
        &identity,
        CreateCommentRequest {
            recipe_id: 424242,
            text:      "hello".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    let err = comments::list(
        &app.state,
        CommentListQuery {
            recipe_id: 424242,
            page:      None,
            per_page:  None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}
