//! Feed queries: the sort allow-list, order, and page window.
//!
//! Sort fields are a closed enumeration mapped to typed selectors by each
//! adapter. Fields backed by a column are sorted in storage. Computed fields
//! (`total_votes`, `user_vote`) cannot use an index, so the storage query
//! falls back to `id asc` and the fetched page alone is reordered in memory.
//! Ordering across pages is therefore not global for computed fields.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use pagination::PageRequest;
use serde_json::json;

use super::{Comment, CommentView, Error, Post, PostView, SubjectKind, UserId, VoteDirection, VoteTally};

/// Allow-listed sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Subject identifier.
    Id,
    /// Author identifier.
    UserId,
    /// Post title (posts only).
    Title,
    /// Body text.
    Content,
    /// Creation instant.
    CreatedAt,
    /// Last modification instant.
    UpdatedAt,
    /// Up vote counter.
    UpVotes,
    /// Down vote counter.
    DownVotes,
    /// Computed `up - down`.
    TotalVotes,
    /// Computed requesting voter's ledger entry.
    UserVote,
}

const POST_FIELDS: &[SortField] = &[
    SortField::Id,
    SortField::UserId,
    SortField::Title,
    SortField::Content,
    SortField::CreatedAt,
    SortField::UpdatedAt,
    SortField::UpVotes,
    SortField::DownVotes,
    SortField::TotalVotes,
    SortField::UserVote,
];

impl SortField {
    /// Wire token for the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::UserId => "user_id",
            Self::Title => "title",
            Self::Content => "content",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::UpVotes => "up_votes",
            Self::DownVotes => "down_votes",
            Self::TotalVotes => "total_votes",
            Self::UserVote => "user_vote",
        }
    }

    /// Whether the field is computed rather than stored.
    pub fn is_computed(self) -> bool {
        matches!(self, Self::TotalVotes | Self::UserVote)
    }

    /// Parse a wire token for a listing of `kind`.
    ///
    /// # Examples
    /// ```
    /// use social_backend::domain::{SortField, SubjectKind};
    ///
    /// assert_eq!(SortField::parse("total_votes", SubjectKind::Post).ok(), Some(SortField::TotalVotes));
    /// assert!(SortField::parse("title", SubjectKind::Comment).is_err());
    /// assert!(SortField::parse("password", SubjectKind::Post).is_err());
    /// ```
    pub fn parse(raw: &str, kind: SubjectKind) -> Result<Self, Error> {
        POST_FIELDS
            .iter()
            .copied()
            .filter(|field| kind == SubjectKind::Post || *field != Self::Title)
            .find(|field| field.as_str() == raw)
            .ok_or_else(|| {
                Error::invalid_request(format!("Invalid sort field: {raw}"))
                    .with_details(json!({ "field": "sort_by", "value": raw }))
            })
    }

    /// Compare two posts on this field, breaking ties by id.
    pub fn compare_posts(self, a: &Post, b: &Post) -> Ordering {
        let primary = match self {
            Self::Title => a.title.cmp(&b.title),
            Self::Content => a.content.cmp(&b.content),
            other => other.compare_common(
                Keys::new(a.id.get(), &a.author_id, a.created_at, a.updated_at, a.tally),
                Keys::new(b.id.get(), &b.author_id, b.created_at, b.updated_at, b.tally),
            ),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    /// Compare two comments on this field, breaking ties by id.
    pub fn compare_comments(self, a: &Comment, b: &Comment) -> Ordering {
        let primary = match self {
            Self::Content => a.content.cmp(&b.content),
            other => other.compare_common(
                Keys::new(a.id.get(), &a.author_id, a.created_at, a.updated_at, a.tally),
                Keys::new(b.id.get(), &b.author_id, b.created_at, b.updated_at, b.tally),
            ),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    fn compare_common(self, a: Keys<'_>, b: Keys<'_>) -> Ordering {
        match self {
            Self::UserId => a.author.as_uuid().cmp(b.author.as_uuid()),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            Self::UpVotes => a.tally.up.cmp(&b.tally.up),
            Self::DownVotes => a.tally.down.cmp(&b.tally.down),
            Self::TotalVotes => a.tally.total().cmp(&b.tally.total()),
            Self::Id | Self::Title | Self::Content | Self::UserVote => a.id.cmp(&b.id),
        }
    }
}

struct Keys<'a> {
    id: i64,
    author: &'a UserId,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    tally: VoteTally,
}

impl<'a> Keys<'a> {
    fn new(
        id: i64,
        author: &'a UserId,
        created_at: chrono::DateTime<chrono::Utc>,
        updated_at: chrono::DateTime<chrono::Utc>,
        tally: VoteTally,
    ) -> Self {
        Self {
            id,
            author,
            created_at,
            updated_at,
            tally,
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

impl SortOrder {
    /// Orient an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(Error::invalid_request(format!("Invalid order value: {raw}"))
                .with_details(json!({ "field": "order", "value": raw })))
        }
    }
}

/// A validated feed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    /// Requested sort field.
    pub sort: SortField,
    /// Requested order.
    pub order: SortOrder,
    /// Requested page window.
    pub page: PageRequest,
    /// Whether to count the whole listing.
    pub include_total: bool,
    /// Voter whose ledger entries annotate the items.
    pub voter: Option<UserId>,
}

impl FeedQuery {
    /// Validate a feed request.
    ///
    /// `user_vote` is only meaningful with a voter and is rejected otherwise.
    pub fn new(
        sort: SortField,
        order: SortOrder,
        page: PageRequest,
        include_total: bool,
        voter: Option<UserId>,
    ) -> Result<Self, Error> {
        if sort == SortField::UserVote && voter.is_none() {
            return Err(
                Error::invalid_request("Sorting by user_vote requires an authenticated user")
                    .with_details(json!({ "field": "sort_by", "value": sort.as_str() })),
            );
        }
        Ok(Self {
            sort,
            order,
            page,
            include_total,
            voter,
        })
    }

    /// The storage-level window for this query.
    pub fn window(&self) -> ListingWindow {
        let (sort, order) = if self.sort.is_computed() {
            (SortField::Id, SortOrder::Asc)
        } else {
            (self.sort, self.order)
        };
        ListingWindow {
            sort,
            order,
            offset: self.page.offset(),
            limit: self.page.per_page(),
            voter: self.voter.clone(),
        }
    }

    /// Reorder a fetched page of posts when sorting by a computed field.
    pub fn sort_post_page(&self, items: &mut [PostView]) {
        if self.sort.is_computed() {
            let (sort, order) = (self.sort, self.order);
            items.sort_by(|a, b| {
                order.apply(computed_ordering(sort, (a.post.tally, a.user_vote), (b.post.tally, b.user_vote)))
            });
        }
    }

    /// Reorder a fetched page of comments when sorting by a computed field.
    pub fn sort_comment_page(&self, items: &mut [CommentView]) {
        if self.sort.is_computed() {
            let (sort, order) = (self.sort, self.order);
            items.sort_by(|a, b| {
                order.apply(computed_ordering(
                    sort,
                    (a.comment.tally, a.user_vote),
                    (b.comment.tally, b.user_vote),
                ))
            });
        }
    }
}

fn computed_ordering(
    sort: SortField,
    (a_tally, a_vote): (VoteTally, Option<VoteDirection>),
    (b_tally, b_vote): (VoteTally, Option<VoteDirection>),
) -> Ordering {
    match sort {
        SortField::UserVote => vote_rank(a_vote).cmp(&vote_rank(b_vote)),
        _ => a_tally.total().cmp(&b_tally.total()),
    }
}

fn vote_rank(vote: Option<VoteDirection>) -> i8 {
    match vote {
        Some(VoteDirection::Down) => -1,
        None => 0,
        Some(VoteDirection::Up) => 1,
    }
}

/// Storage-level listing request.
///
/// `sort` is always a stored field; computed sorts have already been
/// replaced by `id asc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingWindow {
    /// Stored sort field.
    pub sort: SortField,
    /// Sort direction.
    pub order: SortOrder,
    /// Items to skip.
    pub offset: u64,
    /// Maximum items to return.
    pub limit: u32,
    /// Voter whose ledger entries annotate the items.
    pub voter: Option<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuthorSummary, ClientToken, ErrorCode, PostId, Username};
    use chrono::{DateTime, Utc};
    use rstest::rstest;

    #[rstest]
    #[case("id", SubjectKind::Post, SortField::Id)]
    #[case("created_at", SubjectKind::Comment, SortField::CreatedAt)]
    #[case("title", SubjectKind::Post, SortField::Title)]
    #[case("user_vote", SubjectKind::Comment, SortField::UserVote)]
    fn accepts_allow_listed_fields(
        #[case] raw: &str,
        #[case] kind: SubjectKind,
        #[case] expected: SortField,
    ) {
        assert_eq!(SortField::parse(raw, kind).expect("allowed"), expected);
    }

    #[rstest]
    #[case("invalid_field", SubjectKind::Post)]
    #[case("title", SubjectKind::Comment)]
    #[case("CREATED_AT", SubjectKind::Post)]
    #[case("__class__", SubjectKind::Post)]
    fn rejects_other_fields(#[case] raw: &str, #[case] kind: SubjectKind) {
        let err = SortField::parse(raw, kind).expect_err("not allowed");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), format!("Invalid sort field: {raw}"));
    }

    #[rstest]
    #[case("asc", SortOrder::Asc)]
    #[case("DESC", SortOrder::Desc)]
    #[case("Asc", SortOrder::Asc)]
    fn parses_order_case_insensitively(#[case] raw: &str, #[case] expected: SortOrder) {
        assert_eq!(raw.parse::<SortOrder>().expect("valid"), expected);
    }

    #[rstest]
    fn rejects_unknown_order() {
        let err = "sideways".parse::<SortOrder>().expect_err("invalid");
        assert_eq!(err.message(), "Invalid order value: sideways");
    }

    #[rstest]
    fn user_vote_requires_a_voter() {
        let result = FeedQuery::new(
            SortField::UserVote,
            SortOrder::Desc,
            PageRequest::new(1, 20),
            true,
            None,
        );
        assert!(result.is_err());
    }

    #[rstest]
    #[case(SortField::CreatedAt, SortOrder::Desc, SortField::CreatedAt, SortOrder::Desc)]
    #[case(SortField::TotalVotes, SortOrder::Desc, SortField::Id, SortOrder::Asc)]
    #[case(SortField::UserVote, SortOrder::Desc, SortField::Id, SortOrder::Asc)]
    fn computed_fields_fall_back_to_id_in_storage(
        #[case] sort: SortField,
        #[case] order: SortOrder,
        #[case] storage_sort: SortField,
        #[case] storage_order: SortOrder,
    ) {
        let query = FeedQuery::new(sort, order, PageRequest::new(3, 10), false, Some(UserId::random()))
            .expect("valid query");
        let window = query.window();
        assert_eq!((window.sort, window.order), (storage_sort, storage_order));
        assert_eq!(window.offset, 20);
        assert_eq!(window.limit, 10);
    }

    fn view(id: i64, up: u32, down: u32, user_vote: Option<VoteDirection>) -> PostView {
        let author = UserId::random();
        PostView {
            post: Post {
                id: PostId::new(id).expect("id"),
                author_id: author.clone(),
                title: format!("post {id}"),
                content: "body".to_owned(),
                tally: VoteTally::new(up, down),
                client_token: ClientToken::new(format!("tmp-{id}")).expect("token"),
                created_at: DateTime::<Utc>::UNIX_EPOCH,
                updated_at: DateTime::<Utc>::UNIX_EPOCH,
            },
            author: AuthorSummary {
                user_id: author,
                username: Username::new("author").expect("username"),
            },
            user_vote,
            comments: Vec::new(),
        }
    }

    fn ids(items: &[PostView]) -> Vec<i64> {
        items.iter().map(|item| item.post.id.get()).collect()
    }

    #[rstest]
    fn total_votes_sorts_the_page_only() {
        let query = FeedQuery::new(
            SortField::TotalVotes,
            SortOrder::Desc,
            PageRequest::new(1, 20),
            false,
            None,
        )
        .expect("valid query");
        let mut page = vec![view(1, 1, 0, None), view(2, 5, 1, None), view(3, 0, 2, None)];
        query.sort_post_page(&mut page);
        assert_eq!(ids(&page), vec![2, 1, 3]);
    }

    #[rstest]
    fn user_vote_sorts_up_before_none_before_down() {
        let query = FeedQuery::new(
            SortField::UserVote,
            SortOrder::Desc,
            PageRequest::new(1, 20),
            false,
            Some(UserId::random()),
        )
        .expect("valid query");
        let mut page = vec![
            view(1, 0, 0, Some(VoteDirection::Down)),
            view(2, 0, 0, None),
            view(3, 0, 0, Some(VoteDirection::Up)),
        ];
        query.sort_post_page(&mut page);
        assert_eq!(ids(&page), vec![3, 2, 1]);
    }

    #[rstest]
    fn stored_sorts_leave_the_page_untouched() {
        let query = FeedQuery::new(
            SortField::CreatedAt,
            SortOrder::Asc,
            PageRequest::new(1, 20),
            false,
            None,
        )
        .expect("valid query");
        let mut page = vec![view(3, 9, 0, None), view(1, 0, 0, None)];
        query.sort_post_page(&mut page);
        assert_eq!(ids(&page), vec![3, 1]);
    }

    #[rstest]
    fn compare_posts_breaks_ties_by_id() {
        let a = view(1, 2, 0, None).post;
        let b = view(2, 2, 0, None).post;
        assert_eq!(SortField::UpVotes.compare_posts(&a, &b), Ordering::Less);
        assert_eq!(SortField::UpVotes.compare_posts(&b, &a), Ordering::Greater);
    }
}
