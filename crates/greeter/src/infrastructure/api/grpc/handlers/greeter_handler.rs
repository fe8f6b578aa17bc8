// crates/greeter/src/infrastructure/api/grpc/handlers/greeter_handler.rs

use shared_kernel::infrastructure::grpc::{ExceptionHandler, ExceptionHandlerBuilder, RpcContext};
use std::sync::Arc;
use tonic::server::NamedService;
use tonic::{Request, Response, Status};

use super::super::greeter_v1::{
    greeter_service_server::{GreeterService, GreeterServiceServer},
    SayHelloRequest, SayHelloResponse,
};
use crate::application::say_hello::{SayHelloCommand, SayHelloUseCase};
use crate::domain::errors::GreeterError;

const SERVICE_NAME: &str = <GreeterServiceServer<GreeterHandler> as NamedService>::NAME;

pub struct GreeterHandler {
    use_case: Arc<SayHelloUseCase>,
    exceptions: ExceptionHandler,
}

impl GreeterHandler {
    pub fn new(use_case: Arc<SayHelloUseCase>) -> Self {
        let exceptions = ExceptionHandlerBuilder::from_env()
            .for_service(GreeterError::Unspecified)
            .build();
        Self { use_case, exceptions }
    }

    pub fn with_exception_handler(mut self, exceptions: ExceptionHandler) -> Self {
        self.exceptions = exceptions;
        self
    }
}

#[tonic::async_trait]
impl GreeterService for GreeterHandler {
    async fn say_hello(
        &self,
        request: Request<SayHelloRequest>,
    ) -> Result<Response<SayHelloResponse>, Status> {
        let context = RpcContext::from_request(SERVICE_NAME, "SayHello", &request)
            .for_service(GreeterError::Unspecified);
        let command = SayHelloCommand { name: request.into_inner().name };

        context
            .scope(async {
                self.use_case
                    .execute(command)
                    .await
                    .map(|message| Response::new(SayHelloResponse { message }))
                    .map_err(|failure| self.exceptions.handle(failure))
            })
            .await
    }
}
