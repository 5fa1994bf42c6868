use crate::dns::forwarding::RecordTypeMapper;
use ferrous_dyndns_application::ports::ResolutionResult;
use ferrous_dyndns_application::use_cases::HandleDnsQueryUseCase;
use ferrous_dyndns_domain::{DnsRequest, DomainError};
use hickory_proto::op::{Header, MessageType, OpCode, ResponseCode};
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use std::sync::Arc;
use tracing::{debug, error};

/// Bridges hickory's request handling to [`HandleDnsQueryUseCase`].
///
/// Every request gets exactly one response: answers on success, NXDOMAIN
/// when no resolver would answer, SERVFAIL on any other failure.
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    fn response_code_for(error: &DomainError) -> ResponseCode {
        if error.is_declined() {
            ResponseCode::NXDomain
        } else {
            ResponseCode::ServFail
        }
    }
}

#[async_trait::async_trait]
impl RequestHandler for DnsServerHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        if request.message_type() != MessageType::Query {
            return send_error_response(request, &mut response_handle, ResponseCode::FormErr).await;
        }
        if request.op_code() != OpCode::Query {
            debug!(op_code = ?request.op_code(), "Unsupported opcode");
            return send_error_response(request, &mut response_handle, ResponseCode::NotImp).await;
        }

        let request_info = match request.request_info() {
            Ok(info) => info,
            Err(e) => {
                error!(error = %e, "Failed to parse request info");
                return send_error_response(request, &mut response_handle, ResponseCode::FormErr)
                    .await;
            }
        };

        let query = request_info.query.original();
        let domain = query.name().to_ascii();
        let record_type = RecordTypeMapper::from_hickory(query.query_type());
        let class = RecordTypeMapper::class_from_hickory(query.query_class());
        let client_ip = request.src().ip();

        debug!(domain = %domain, record_type = %record_type, class = %class, client = %client_ip, "DNS query received");

        let dns_request = DnsRequest::new(domain, record_type, client_ip).with_class(class);

        match self.use_case.execute(&dns_request).await {
            Ok(resolution) => send_resolution(request, &mut response_handle, &resolution).await,
            Err(e) => {
                let code = Self::response_code_for(&e);
                send_error_response(request, &mut response_handle, code).await
            }
        }
    }
}

async fn send_resolution<R: ResponseHandler>(
    request: &Request,
    response_handle: &mut R,
    resolution: &ResolutionResult,
) -> ResponseInfo {
    let builder = MessageResponseBuilder::from_message_request(request);
    let mut header = Header::response_from_request(request.header());
    header.set_recursion_available(true);

    debug!(
        answers = resolution.answers.len(),
        authority = resolution.authority.len(),
        additional = resolution.additional.len(),
        "Sending response"
    );

    let response = builder.build(
        header,
        resolution.answers.iter(),
        resolution.authority.iter(),
        &[],
        resolution.additional.iter(),
    );

    match response_handle.send_response(response).await {
        Ok(info) => info,
        Err(e) => {
            error!(error = %e, "Failed to send response");
            ResponseInfo::from(header)
        }
    }
}

async fn send_error_response<R: ResponseHandler>(
    request: &Request,
    response_handle: &mut R,
    code: ResponseCode,
) -> ResponseInfo {
    debug!(code = ?code, "Sending error response");
    let builder = MessageResponseBuilder::from_message_request(request);
    let mut header = Header::response_from_request(request.header());
    header.set_response_code(code);
    header.set_recursion_available(true);
    let response = builder.build_no_records(header);

    match response_handle.send_response(response).await {
        Ok(info) => info,
        Err(e) => {
            error!(error = %e, "Failed to send error response");
            ResponseInfo::from(header)
        }
    }
}
