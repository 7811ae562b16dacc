// Repository contracts (ports) implemented by the infrastructure layer

pub mod member_repository;
pub mod team_repository;

pub use member_repository::MemberRepository;
pub use team_repository::TeamRepository;
