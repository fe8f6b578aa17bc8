// crates/greeter/src/application/say_hello/say_hello_use_case.rs

use shared_kernel::errors::{CodeMap, ErrorRules, Failure, FailureResult, Fault, GrpcError, TypeRules};
use shared_kernel::infrastructure::grpc::{catch_async, CatchScope};
use std::sync::Arc;

use crate::application::say_hello::SayHelloCommand;
use crate::application::UserInternalService;
use crate::domain::errors::{GreeterError, LevelServiceError, UserInternalError};
use crate::domain::ports::LevelClient;
use crate::domain::repositories::UserRepository;

pub struct SayHelloUseCase {
    users: Arc<dyn UserRepository>,
    internal: Arc<UserInternalService>,
    levels: Arc<dyn LevelClient>,
    invalid_rules: ErrorRules,
    state_rules: ErrorRules,
    banned_rules: ErrorRules,
    level_rules: ErrorRules,
}

impl SayHelloUseCase {
    pub fn new(
        users: Arc<dyn UserRepository>,
        internal: Arc<UserInternalService>,
        levels: Arc<dyn LevelClient>,
    ) -> Self {
        Self {
            users,
            internal,
            levels,
            invalid_rules: ErrorRules::fixed(GreeterError::UserInvalid),
            state_rules: TypeRules::new(GreeterError::Unspecified)
                .on_match::<Fault, _>(GreeterError::UserInvalid, Fault::is_invalid_state)
                .into(),
            banned_rules: CodeMap::new(GreeterError::Unspecified)
                .map(UserInternalError::BannedUser, GreeterError::UserBanned)
                .into(),
            level_rules: CodeMap::new(GreeterError::Unspecified)
                .map(LevelServiceError::LevelSystemUnavailable, GreeterError::ServiceUnavailable)
                .into(),
        }
    }

    pub async fn execute(&self, command: SayHelloCommand) -> FailureResult<String> {
        // 1. Unknown user: expected violation, raised as is
        let user = self
            .users
            .find_by_name(&command.name)
            .await?
            .ok_or_else(|| GrpcError::domain(GreeterError::UserNotFound))?;

        // 2. Any failure of this block is an invalid user
        let internal = self.internal.clone();
        let candidate = user.clone();
        CatchScope::new(&self.invalid_rules)
            .run_blocking(move || Ok(internal.check_user_invalid(&candidate)?))
            .await?;

        // 3. Classified by failure type
        CatchScope::new(&self.state_rules).run(|| Ok(self.internal.check_user_state(&user)?))?;

        // 4. Internal code translated into ours
        let banned = CatchScope::new(&self.banned_rules)
            .for_service::<GreeterError>()
            .run(|| Ok(self.internal.check_user_banned(&user)?))?;
        if !banned {
            tracing::debug!(nickname = %user.nickname, "user is ok");
        }

        // 5. Level service code translated into ours
        let level = catch_async(&self.level_rules, || async {
            Ok::<_, Failure>(self.levels.get_level(user.id).await?)
        })
        .await?;

        if level == 0 {
            return Err(GrpcError::domain(GreeterError::UserInvalid).into());
        }

        Ok(format!("Hello, {}!", user.nickname))
    }
}
