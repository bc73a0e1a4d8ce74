//! Tests for the feed service.

use std::sync::Arc;

use super::*;
use crate::domain::fixtures::{comment_view, post_view};
use crate::domain::ports::MockFeedRepository;
use crate::domain::{ErrorCode, SortField, SortOrder, UserId, VoteDirection, VoteTally};
use pagination::PageRequest;
use rstest::rstest;

fn query(sort: SortField, page: i64, per_page: i64, include_total: bool) -> FeedQuery {
    FeedQuery::new(
        sort,
        SortOrder::Desc,
        PageRequest::new(page, per_page),
        include_total,
        Some(UserId::random()),
    )
    .expect("valid query")
}

fn ids(page: &Paginated<PostView>) -> Vec<i64> {
    page.items.iter().map(|item| item.post.id.get()).collect()
}

#[rstest]
#[tokio::test]
async fn first_page_of_forty_five_reports_totals() {
    let mut repo = MockFeedRepository::new();
    repo.expect_list_posts()
        .withf(|window| window.offset == 0 && window.limit == 20)
        .times(1)
        .return_once(|_| {
            Ok((1..=20)
                .map(|id| post_view(id, VoteTally::default(), None))
                .collect())
        });
    repo.expect_comments_for_posts()
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));
    repo.expect_count_posts().times(1).return_once(|| Ok(45));

    let service = FeedService::new(Arc::new(repo));
    let page = service
        .list_posts(query(SortField::CreatedAt, 1, 20, true))
        .await
        .expect("feed succeeds");

    assert_eq!(page.len(), 20);
    assert!(page.pagination.has_next);
    assert!(!page.pagination.has_prev);
    assert_eq!(page.pagination.total, Some(45));
    assert_eq!(page.pagination.total_pages, Some(3));
    assert_eq!(page.pagination.next_page, Some(2));
}

#[rstest]
#[tokio::test]
async fn totals_are_skipped_unless_requested() {
    let mut repo = MockFeedRepository::new();
    repo.expect_list_posts()
        .times(1)
        .return_once(|_| Ok(vec![post_view(1, VoteTally::default(), None)]));
    repo.expect_comments_for_posts()
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));
    repo.expect_count_posts().times(0);

    let service = FeedService::new(Arc::new(repo));
    let page = service
        .list_posts(query(SortField::Id, 1, 20, false))
        .await
        .expect("feed succeeds");
    assert_eq!(page.pagination.total, None);
    assert!(!page.pagination.has_next);
}

#[rstest]
#[tokio::test]
async fn computed_sort_reorders_only_the_fetched_page() {
    let mut repo = MockFeedRepository::new();
    repo.expect_list_posts()
        .withf(|window| window.sort == SortField::Id && window.order == SortOrder::Asc)
        .times(1)
        .return_once(|_| {
            Ok(vec![
                post_view(1, VoteTally::new(1, 0), None),
                post_view(2, VoteTally::new(0, 3), None),
                post_view(3, VoteTally::new(4, 0), None),
            ])
        });
    repo.expect_comments_for_posts()
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));

    let service = FeedService::new(Arc::new(repo));
    let page = service
        .list_posts(query(SortField::TotalVotes, 1, 20, false))
        .await
        .expect("feed succeeds");
    assert_eq!(ids(&page), vec![3, 1, 2]);
}

#[rstest]
#[tokio::test]
async fn comments_are_embedded_under_their_posts() {
    let mut repo = MockFeedRepository::new();
    repo.expect_list_posts().times(1).return_once(|_| {
        Ok(vec![
            post_view(1, VoteTally::default(), None),
            post_view(2, VoteTally::default(), Some(VoteDirection::Up)),
        ])
    });
    repo.expect_comments_for_posts()
        .withf(|posts, voter| posts.len() == 2 && voter.is_some())
        .times(1)
        .return_once(|_, _| {
            Ok(vec![
                comment_view(10, 2, Some(VoteDirection::Down)),
                comment_view(11, 2, None),
                comment_view(12, 1, None),
            ])
        });

    let service = FeedService::new(Arc::new(repo));
    let page = service
        .list_posts(query(SortField::CreatedAt, 1, 20, false))
        .await
        .expect("feed succeeds");

    let first = page.items.first().expect("first post");
    let second = page.items.get(1).expect("second post");
    assert_eq!(first.comments.len(), 1);
    assert_eq!(second.comments.len(), 2);
    assert_eq!(
        second.comments.first().and_then(|c| c.user_vote),
        Some(VoteDirection::Down)
    );
    assert_eq!(second.user_vote, Some(VoteDirection::Up));
}

#[rstest]
#[tokio::test]
async fn empty_pages_skip_the_comment_query() {
    let mut repo = MockFeedRepository::new();
    repo.expect_list_posts().times(1).return_once(|_| Ok(Vec::new()));
    repo.expect_comments_for_posts().times(0);
    repo.expect_count_posts().times(1).return_once(|| Ok(0));

    let service = FeedService::new(Arc::new(repo));
    let page = service
        .list_posts(query(SortField::CreatedAt, 4, 20, true))
        .await
        .expect("feed succeeds");
    assert!(page.is_empty());
    assert_eq!(page.pagination.total_pages, Some(0));
    assert!(page.pagination.has_prev);
}

#[rstest]
#[tokio::test]
async fn comments_of_a_missing_post_are_not_found() {
    let mut repo = MockFeedRepository::new();
    repo.expect_post_exists().times(1).return_once(|_| Ok(false));
    repo.expect_list_comments().times(0);

    let service = FeedService::new(Arc::new(repo));
    let error = service
        .list_comments(
            PostId::new(99).expect("id"),
            query(SortField::CreatedAt, 1, 20, true),
        )
        .await
        .expect_err("missing post");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Post 99 not found");
}

#[rstest]
#[tokio::test]
async fn comment_pages_report_totals() {
    let mut repo = MockFeedRepository::new();
    repo.expect_post_exists().times(1).return_once(|_| Ok(true));
    repo.expect_list_comments()
        .withf(|post, window| post.get() == 5 && window.offset == 2 && window.limit == 2)
        .times(1)
        .return_once(|_, _| Ok(vec![comment_view(3, 5, None), comment_view(4, 5, None)]));
    repo.expect_count_comments().times(1).return_once(|_| Ok(5));

    let service = FeedService::new(Arc::new(repo));
    let page = service
        .list_comments(
            PostId::new(5).expect("id"),
            query(SortField::CreatedAt, 2, 2, true),
        )
        .await
        .expect("comments succeed");
    assert_eq!(page.len(), 2);
    assert_eq!(page.pagination.total_pages, Some(3));
    assert_eq!(page.pagination.prev_page, Some(1));
    assert_eq!(page.pagination.next_page, Some(3));
}

#[rstest]
#[case(FeedRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(FeedRepositoryError::query("bad column"), ErrorCode::InternalError)]
#[tokio::test]
async fn repository_failures_map_by_kind(
    #[case] failure: FeedRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockFeedRepository::new();
    repo.expect_list_posts()
        .times(1)
        .return_once(move |_| Err(failure));

    let service = FeedService::new(Arc::new(repo));
    let error = service
        .list_posts(query(SortField::CreatedAt, 1, 20, true))
        .await
        .expect_err("feed fails");
    assert_eq!(error.code(), expected);
}
