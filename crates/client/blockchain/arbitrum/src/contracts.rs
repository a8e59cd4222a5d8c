//! Contract bindings.
//!
//! The session contract is a Stylus program; its public methods are exported
//! under camelCase names, which is what these interfaces declare.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface ITozlowSession {
        error AlreadyInitialized();
        error NotParticipant();
        error AlreadyDeposited();
        error DeadlineNotReached();
        error DeadlineReached();
        error AlreadyFinalized();
        error NotEnoughParticipants();
        error TooManyParticipants();
        error TransferFailed();
        error AlreadyVoted();
        error InvalidAbsent();
        error NotAllDeposited();
        error VotingNotOpen();
        error VotingClosed();
        error SessionNotActive();
        error CannotVoteSelf();

        event SessionCreated(
            uint256 indexed sessionId,
            address indexed host,
            uint256 amount,
            uint256 deadline,
            uint256 votingPeriod,
            uint256 participantCount
        );
        event Deposited(uint256 indexed sessionId, address indexed participant);
        event VoteCast(uint256 indexed sessionId, address indexed voter, address indexed absent);
        event Finalized(uint256 indexed sessionId, uint256 absenteeCount, uint256 rewardPerAttendee);
        event Refunded(uint256 indexed sessionId);

        function createSession(
            uint256 amount,
            uint256 deadline,
            uint256 votingPeriod,
            address[] participants
        ) external returns (uint256);
        function deposit(uint256 sessionId) external;
        function castVote(uint256 sessionId, address absent) external;
        function finalizeSession(uint256 sessionId) external;

        function getSession(uint256 sessionId) external view returns (
            address host,
            uint256 amount,
            uint256 deadline,
            uint256 votingPeriod,
            bool finalized,
            bool active,
            uint256 participantCount
        );
        function getParticipantAt(uint256 sessionId, uint256 index) external view returns (address);
        function hasDeposited(uint256 sessionId, address addr) external view returns (bool);
        function hasVoted(uint256 sessionId, address addr) external view returns (bool);
        function absenceVoteCount(uint256 sessionId, address addr) external view returns (uint256);
        function votingDeadline(uint256 sessionId) external view returns (uint256);
        function sessionCount() external view returns (uint256);
        function usdcAddress() external view returns (address);
    }

    #[sol(rpc)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
    }
}
